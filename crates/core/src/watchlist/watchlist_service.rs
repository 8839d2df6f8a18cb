use std::sync::Arc;

use async_trait::async_trait;
use log::info;

use super::watchlist_model::WatchToggle;
use super::watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
use crate::errors::{Result, ValidationError};
use crate::quotes::validate_stock_code;

pub struct WatchlistService {
    repository: Arc<dyn WatchlistRepositoryTrait>,
}

impl WatchlistService {
    pub fn new(repository: Arc<dyn WatchlistRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl WatchlistServiceTrait for WatchlistService {
    fn user_watchlist(&self, user_id: &str) -> Result<Vec<String>> {
        let mut codes: Vec<String> = self
            .repository
            .list_entries(user_id)?
            .into_iter()
            .map(|e| e.asx_code)
            .collect();
        codes.sort();
        codes.dedup();
        Ok(codes)
    }

    fn is_watched(&self, user_id: &str, asx_code: &str) -> Result<bool> {
        self.repository.contains(user_id, asx_code)
    }

    async fn toggle(&self, user_id: &str, asx_code: &str) -> Result<WatchToggle> {
        let code = validate_stock_code(asx_code).ok_or_else(|| {
            ValidationError::InvalidInput(format!("Invalid stock code: {}", asx_code))
        })?;
        if self.repository.contains(user_id, &code)? {
            self.repository.remove(user_id, &code).await?;
            info!("Removed {} from watchlist of {}", code, user_id);
            Ok(WatchToggle::Removed)
        } else {
            self.repository.add(user_id, &code).await?;
            info!("Added {} to watchlist of {}", code, user_id);
            Ok(WatchToggle::Added)
        }
    }
}
