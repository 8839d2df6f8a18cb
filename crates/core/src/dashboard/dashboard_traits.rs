use chrono::NaiveDate;

use super::pages::{
    ListingPage, MarketSentimentPage, PortfolioPage, PurchaseFormPage, SearchPage, StockPage,
    TrendsPage,
};
use super::search_criteria::{CompanySearch, SectorSearch, YieldSearch};
use crate::errors::Result;
use crate::export::Dataset;
use crate::quotes::PriceMatrix;

/// Assembles page view models. `today` is the exchange-local date of the request.
///
/// `page` is the raw `?page=` value.
pub trait DashboardServiceTrait: Send + Sync {
    fn sector_search(
        &self,
        user_id: &str,
        criteria: Option<SectorSearch>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<SearchPage<SectorSearch>>;

    fn yield_search(
        &self,
        user_id: &str,
        criteria: Option<YieldSearch>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<SearchPage<YieldSearch>>;

    fn company_search(
        &self,
        user_id: &str,
        criteria: Option<CompanySearch>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<SearchPage<CompanySearch>>;

    fn all_stocks(&self, user_id: &str, page: Option<&str>) -> Result<ListingPage>;

    fn stock_detail(&self, user_id: &str, code: &str, today: NaiveDate) -> Result<StockPage>;

    fn etfs(&self, user_id: &str, page: Option<&str>, today: NaiveDate) -> Result<ListingPage>;

    fn increasing_eps(
        &self,
        user_id: &str,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<ListingPage>;

    fn increasing_yield(
        &self,
        user_id: &str,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<ListingPage>;

    fn watched(&self, user_id: &str, page: Option<&str>, today: NaiveDate) -> Result<ListingPage>;

    fn market_sentiment(&self, user_id: &str, today: NaiveDate) -> Result<MarketSentimentPage>;

    fn trends(&self, user_id: &str, today: NaiveDate) -> Result<TrendsPage>;

    fn portfolio(&self, user_id: &str, today: NaiveDate) -> Result<PortfolioPage>;

    fn buy_form(&self, code: &str, amount: Option<f64>) -> Result<PurchaseFormPage>;

    fn dataset(&self, dataset: Dataset, today: NaiveDate) -> Result<PriceMatrix>;
}
