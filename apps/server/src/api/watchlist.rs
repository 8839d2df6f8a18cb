use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    response::Redirect,
    routing::get,
    Router,
};

use super::shared::validate_next;
use crate::{
    auth::{CurrentUser, NextQuery},
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

/// Adds the stock to the watchlist, or removes it when already watched.
async fn toggle_watched(
    Path(stock): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<NextQuery>,
) -> ApiResult<Redirect> {
    // Checked before the toggle so a rejected redirect changes nothing.
    let next = validate_next(query.next.as_deref()).map_err(ApiError::BadRequest)?;
    state.watchlist_service.toggle(&user.id, &stock).await?;
    Ok(Redirect::to(&next))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route(
        "/toggle-watch/{stock}",
        get(toggle_watched).post(toggle_watched),
    )
}
