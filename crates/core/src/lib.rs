//! asxtrade Core - Domain entities, services, and traits.
//!
//! This crate contains the dashboard's business logic: quotations, companies,
//! watchlists, virtual purchases, the analysis and chart routines, dataset
//! export and page assembly. It is database-agnostic and defines traits that
//! are implemented by the `storage-sqlite` crate.

pub mod analysis;
pub mod charts;
pub mod companies;
pub mod constants;
pub mod dashboard;
pub mod errors;
pub mod export;
pub mod purchases;
pub mod quotes;
pub mod users;
pub mod utils;
pub mod watchlist;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
