//! SQLite storage implementation for dashboard logins.

mod model;
mod repository;

pub use model::UserDB;
pub use repository::UserRepository;
