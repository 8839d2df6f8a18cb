//! SQLite storage for the ASX dashboard.
//!
//! Implements the repository traits of `asxtrade-core` with Diesel over a
//! pooled SQLite database. Reads use pooled connections; every write goes
//! through the single writer actor so SQLite never sees two writers at once.
//!
//! ```text
//! core (domain traits)
//!        │
//!        ▼
//! storage-sqlite (this crate)
//!        │
//!        ▼
//!    SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod companies;
pub mod purchases;
pub mod quotes;
pub mod users;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConnection,
    DbPool, WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use asxtrade_core::errors::{DatabaseError, Error, Result};
