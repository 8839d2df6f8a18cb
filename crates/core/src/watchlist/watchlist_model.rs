//! Watchlist domain models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stock a user is watching.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WatchlistEntry {
    pub user_id: String,
    pub asx_code: String,
    pub added_at: NaiveDateTime,
}

/// Outcome of flipping a stock's watched state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum WatchToggle {
    Added,
    Removed,
}
