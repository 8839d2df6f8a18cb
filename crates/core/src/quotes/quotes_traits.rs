//! Quotation repository and service traits.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::price_matrix::PriceMatrix;
use super::quotes_model::{QuotationFilter, QuotationOrder, QuoteField, Quotation};
use crate::errors::Result;

/// Storage contract for quotations.
#[async_trait]
pub trait QuoteRepositoryTrait: Send + Sync {
    /// Distinct fetch dates, ascending. Restricted to one stock when `asx_code` is given.
    fn available_dates(&self, asx_code: Option<&str>) -> Result<Vec<NaiveDate>>;

    /// All quotations stored for one day, optionally restricted to some codes.
    fn quotes_on(&self, date: NaiveDate, codes: Option<&[String]>) -> Result<Vec<Quotation>>;

    /// Quotations between two days (inclusive), ordered by code then date.
    fn quotes_between(
        &self,
        codes: Option<&[String]>,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Quotation>>;

    /// Inserts or replaces quotations keyed by (code, date).
    async fn upsert_quotations(&self, quotations: Vec<Quotation>) -> Result<usize>;
}

#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// The trading calendar: dates the reference stock (or, failing that, any stock) traded.
    fn all_available_dates(&self) -> Result<Vec<NaiveDate>>;

    fn latest_quotation_date(&self) -> Result<Option<NaiveDate>>;

    /// Filtered and ordered quotations of one day.
    fn find_quotations(
        &self,
        date: NaiveDate,
        filter: &QuotationFilter,
        order: QuotationOrder,
    ) -> Result<Vec<Quotation>>;

    /// Quotations of the latest trading day for the given codes, with that day.
    fn latest_quotes(&self, codes: &[String]) -> Result<(Vec<Quotation>, Option<NaiveDate>)>;

    fn latest_quote(&self, asx_code: &str) -> Result<Option<Quotation>>;

    /// One stock's quotations over a window, ascending by date.
    fn stock_quotes(&self, asx_code: &str, dates: &[NaiveDate]) -> Result<Vec<Quotation>>;

    /// Pivot of one field over a window; `None` means every stock.
    fn company_prices(
        &self,
        codes: Option<&[String]>,
        dates: &[NaiveDate],
        field: QuoteField,
    ) -> Result<PriceMatrix>;

    /// Stocks whose `field` rose (never fell) over the window.
    fn increasing_only(&self, field: QuoteField, dates: &[NaiveDate]) -> Result<Vec<String>>;

    async fn import_quotations(&self, quotations: Vec<Quotation>) -> Result<usize>;
}
