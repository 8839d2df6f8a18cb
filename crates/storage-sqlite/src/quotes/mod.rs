//! SQLite storage implementation for daily quotations.

mod model;
mod repository;

pub use model::QuotationDB;
pub use repository::QuoteRepository;
