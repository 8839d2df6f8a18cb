//! Companies module - securities, company details, services, and traits.

mod companies_model;
mod companies_service;
mod companies_traits;

pub use companies_model::{CompanyDetails, Security, ETF_SECURITY_NAME};
pub use companies_service::CompanyService;
pub use companies_traits::{CompanyRepositoryTrait, CompanyServiceTrait};
