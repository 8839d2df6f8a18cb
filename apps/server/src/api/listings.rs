//! Stock listings, market sentiment and watchlist trends.

use std::sync::Arc;

use asxtrade_core::dashboard::{ListingPage, MarketSentimentPage, TrendsPage};
use axum::{
    extract::{Extension, Query, State},
    routing::get,
    Json, Router,
};

use super::shared::{render, today, PageQuery};
use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn all_stocks(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ListingPage>> {
    let page = state
        .dashboard_service
        .all_stocks(&user.id, query.page.as_deref())?;
    Ok(render(&state, &user, page))
}

async fn show_etfs(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ListingPage>> {
    let page = state
        .dashboard_service
        .etfs(&user.id, query.page.as_deref(), today())?;
    Ok(render(&state, &user, page))
}

async fn show_increasing_eps(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ListingPage>> {
    let page = state
        .dashboard_service
        .increasing_eps(&user.id, query.page.as_deref(), today())?;
    Ok(render(&state, &user, page))
}

async fn show_increasing_yield(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ListingPage>> {
    let page = state
        .dashboard_service
        .increasing_yield(&user.id, query.page.as_deref(), today())?;
    Ok(render(&state, &user, page))
}

async fn show_watched(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<ListingPage>> {
    let page = state
        .dashboard_service
        .watched(&user.id, query.page.as_deref(), today())?;
    Ok(render(&state, &user, page))
}

async fn market_sentiment(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<MarketSentimentPage>> {
    let page = state
        .dashboard_service
        .market_sentiment(&user.id, today())?;
    Ok(render(&state, &user, page))
}

async fn show_trends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<TrendsPage>> {
    let page = state.dashboard_service.trends(&user.id, today())?;
    Ok(render(&state, &user, page))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(all_stocks))
        .route("/show/etfs", get(show_etfs))
        .route("/show/increasing-eps", get(show_increasing_eps))
        .route("/show/increasing-yield", get(show_increasing_yield))
        .route("/show/watched", get(show_watched))
        .route("/show/trends", get(show_trends))
        .route("/market-sentiment", get(market_sentiment))
}
