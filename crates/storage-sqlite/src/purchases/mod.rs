//! SQLite storage implementation for virtual purchases.

mod model;
mod repository;

pub use model::VirtualPurchaseDB;
pub use repository::PurchaseRepository;
