use std::sync::Arc;

use asxtrade_core::dashboard::StockPage;
use axum::{
    extract::{Extension, Path, State},
    routing::get,
    Json, Router,
};

use super::shared::{render, today};
use crate::{auth::CurrentUser, error::ApiResult, main_lib::AppState};

async fn show_stock(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<StockPage>> {
    let page = state
        .dashboard_service
        .stock_detail(&user.id, &code, today())?;
    Ok(render(&state, &user, page))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stock/{code}", get(show_stock))
}
