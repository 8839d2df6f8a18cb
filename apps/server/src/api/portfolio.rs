use std::sync::Arc;

use asxtrade_core::dashboard::PortfolioPage;
use axum::{
    extract::{Extension, State},
    routing::get,
    Json, Router,
};

use super::shared::{render, today};
use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

/// Performance of the user's virtual purchases from the first buy date to today.
async fn show_portfolio(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<PortfolioPage>> {
    let page = state.dashboard_service.portfolio(&user.id, today())?;
    Ok(render(&state, &user, page))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/show/portfolio", get(show_portfolio))
}
