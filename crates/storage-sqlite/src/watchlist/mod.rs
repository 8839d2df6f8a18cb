//! SQLite storage implementation for per-user watchlists.

mod model;
mod repository;

pub use model::WatchlistEntryDB;
pub use repository::WatchlistRepository;
