//! Watchlist module - per-user watched stocks.

mod watchlist_model;
mod watchlist_service;
mod watchlist_traits;

pub use watchlist_model::{WatchToggle, WatchlistEntry};
pub use watchlist_service::WatchlistService;
pub use watchlist_traits::{WatchlistRepositoryTrait, WatchlistServiceTrait};
