use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;

use super::price_matrix::PriceMatrix;
use super::quotes_model::{QuotationFilter, QuotationOrder, QuoteField, Quotation};
use super::quotes_traits::{QuoteRepositoryTrait, QuoteServiceTrait};
use crate::analysis::fundamentals::increasing_only_filter;
use crate::errors::Result;

pub struct QuoteService {
    repository: Arc<dyn QuoteRepositoryTrait>,
    reference_stock: String,
}

impl QuoteService {
    pub fn new(repository: Arc<dyn QuoteRepositoryTrait>, reference_stock: impl Into<String>) -> Self {
        Self {
            repository,
            reference_stock: reference_stock.into(),
        }
    }

    fn window(dates: &[NaiveDate]) -> Option<(NaiveDate, NaiveDate)> {
        let start = dates.iter().min()?;
        let end = dates.iter().max()?;
        Some((*start, *end))
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    fn all_available_dates(&self) -> Result<Vec<NaiveDate>> {
        let dates = self
            .repository
            .available_dates(Some(self.reference_stock.as_str()))?;
        if !dates.is_empty() {
            return Ok(dates);
        }
        debug!(
            "Reference stock {} has no quotations, using every stock's dates",
            self.reference_stock
        );
        self.repository.available_dates(None)
    }

    fn latest_quotation_date(&self) -> Result<Option<NaiveDate>> {
        Ok(self.all_available_dates()?.last().copied())
    }

    fn find_quotations(
        &self,
        date: NaiveDate,
        filter: &QuotationFilter,
        order: QuotationOrder,
    ) -> Result<Vec<Quotation>> {
        let mut quotes: Vec<Quotation> = self
            .repository
            .quotes_on(date, filter.codes.as_deref())?
            .into_iter()
            .filter(|q| filter.matches(q))
            .collect();
        order.sort(&mut quotes);
        Ok(quotes)
    }

    fn latest_quotes(&self, codes: &[String]) -> Result<(Vec<Quotation>, Option<NaiveDate>)> {
        let Some(latest) = self.latest_quotation_date()? else {
            return Ok((Vec::new(), None));
        };
        if codes.is_empty() {
            return Ok((Vec::new(), Some(latest)));
        }
        let quotes = self.repository.quotes_on(latest, Some(codes))?;
        Ok((quotes, Some(latest)))
    }

    fn latest_quote(&self, asx_code: &str) -> Result<Option<Quotation>> {
        let (quotes, _) = self.latest_quotes(&[asx_code.to_string()])?;
        Ok(quotes.into_iter().next())
    }

    fn stock_quotes(&self, asx_code: &str, dates: &[NaiveDate]) -> Result<Vec<Quotation>> {
        let Some((start, end)) = Self::window(dates) else {
            return Ok(Vec::new());
        };
        let codes = [asx_code.to_string()];
        let mut quotes = self.repository.quotes_between(Some(&codes[..]), start, end)?;
        quotes.sort_by_key(|q| q.fetch_date);
        Ok(quotes)
    }

    fn company_prices(
        &self,
        codes: Option<&[String]>,
        dates: &[NaiveDate],
        field: QuoteField,
    ) -> Result<PriceMatrix> {
        let Some((start, end)) = Self::window(dates) else {
            return Ok(PriceMatrix::from_quotations(field, std::iter::empty()));
        };
        if codes.is_some_and(|c| c.is_empty()) {
            return Ok(PriceMatrix::from_quotations(field, std::iter::empty()));
        }
        let quotes = self.repository.quotes_between(codes, start, end)?;
        debug!(
            "Pivoting {} quotations of {} between {} and {}",
            quotes.len(),
            field.as_str(),
            start,
            end
        );
        Ok(PriceMatrix::from_quotations(field, &quotes))
    }

    fn increasing_only(&self, field: QuoteField, dates: &[NaiveDate]) -> Result<Vec<String>> {
        let matrix = self.company_prices(None, dates, field)?;
        Ok(increasing_only_filter(&matrix))
    }

    async fn import_quotations(&self, quotations: Vec<Quotation>) -> Result<usize> {
        self.repository.upsert_quotations(quotations).await
    }
}
