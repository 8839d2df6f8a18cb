use async_trait::async_trait;

use super::watchlist_model::{WatchToggle, WatchlistEntry};
use crate::errors::Result;

/// Trait for watchlist repository operations
#[async_trait]
pub trait WatchlistRepositoryTrait: Send + Sync {
    fn list_entries(&self, user_id: &str) -> Result<Vec<WatchlistEntry>>;
    fn contains(&self, user_id: &str, asx_code: &str) -> Result<bool>;
    /// Inserts the entry; an existing one is left untouched.
    async fn add(&self, user_id: &str, asx_code: &str) -> Result<usize>;
    async fn remove(&self, user_id: &str, asx_code: &str) -> Result<usize>;
}

/// Trait for watchlist service operations
#[async_trait]
pub trait WatchlistServiceTrait: Send + Sync {
    /// Watched codes, ascending.
    fn user_watchlist(&self, user_id: &str) -> Result<Vec<String>>;
    fn is_watched(&self, user_id: &str, asx_code: &str) -> Result<bool>;
    async fn toggle(&self, user_id: &str, asx_code: &str) -> Result<WatchToggle>;
}
