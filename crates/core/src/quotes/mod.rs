//! Quotes module - daily quotations, price tables, services, and traits.

mod price_matrix;
mod quotes_model;
mod quotes_service;
mod quotes_traits;

pub use price_matrix::PriceMatrix;
pub use quotes_model::{
    validate_stock_code, QuotationFilter, QuotationOrder, QuoteField, Quotation,
};
pub use quotes_service::QuoteService;
pub use quotes_traits::{QuoteRepositoryTrait, QuoteServiceTrait};
