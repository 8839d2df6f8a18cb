//! Dashboard module - assembles the page view models served by the web app.

mod dashboard_service;
mod dashboard_traits;
mod messages;
mod pages;
mod search_criteria;

#[cfg(test)]
mod dashboard_service_tests;

pub use dashboard_service::DashboardService;
pub use dashboard_traits::DashboardServiceTrait;
pub use messages::{Message, MessageLevel, WithMessages};
pub use pages::{
    ListingPage, MarketSentimentPage, PortfolioPage, PurchaseFormPage, PurchasePage, SearchPage,
    SentimentSummary, StockPage, TrendsPage,
};
pub use search_criteria::{
    CompanySearch, SectorSearch, YieldSearch, DEFAULT_MAX_YIELD, DEFAULT_MIN_YIELD,
};
