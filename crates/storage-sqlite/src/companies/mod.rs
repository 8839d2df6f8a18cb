//! SQLite storage implementation for securities and company details.

mod model;
mod repository;

pub use model::{CompanyDetailsDB, SecurityDB};
pub use repository::CompanyRepository;
