//! Helpers shared by the page handlers.

use std::str::FromStr;

use asxtrade_core::dashboard::WithMessages;
use asxtrade_core::errors::{Error as CoreError, ValidationError};
use asxtrade_core::utils::time_utils::exchange_today;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::error::ApiResult;
use crate::main_lib::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Today in the exchange timezone; every date window ends here.
pub fn today() -> NaiveDate {
    exchange_today()
}

/// Shows any queued flash messages above the page's own messages.
pub fn render<P: WithMessages>(state: &AppState, user: &CurrentUser, mut page: P) -> Json<P> {
    page.prepend_messages(state.sessions.take_flash(&user.id));
    Json(page)
}

/// Checks a post-action redirect target. Only same-site paths are followed.
pub fn validate_next(raw: Option<&str>) -> Result<String, String> {
    let next = raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("/");
    if !next.starts_with('/') || next.starts_with("//") || next.starts_with("/\\") {
        return Err(format!("Refusing to redirect to '{}'", next));
    }
    Ok(next.to_string())
}

/// A submitted form value; blank counts as absent.
pub fn field(raw: &Option<String>) -> Option<&str> {
    raw.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

pub fn parse_field<T: FromStr>(name: &str, raw: &str) -> ApiResult<T> {
    raw.parse::<T>().map_err(|_| {
        CoreError::from(ValidationError::InvalidInput(format!(
            "{}: '{}' is not a valid value",
            name, raw
        )))
        .into()
    })
}

pub fn parse_optional<T: FromStr>(name: &str, raw: &Option<String>) -> ApiResult<Option<T>> {
    field(raw).map(|v| parse_field(name, v)).transpose()
}

pub fn parse_required<T: FromStr>(name: &str, raw: &Option<String>) -> ApiResult<T> {
    let value = field(raw)
        .ok_or_else(|| CoreError::from(ValidationError::MissingField(name.to_string())))?;
    parse_field(name, value)
}

/// Checkbox semantics: browsers send `on`, API clients tend to send `true` or `1`.
pub fn is_checked(raw: &Option<String>) -> bool {
    matches!(
        field(raw).map(str::to_ascii_lowercase).as_deref(),
        Some("on" | "true" | "1" | "yes")
    )
}
