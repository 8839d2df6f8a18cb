//! Quotation domain models.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A per-stock, per-trading-day price and fundamentals snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Quotation {
    pub asx_code: String,
    pub fetch_date: NaiveDate,
    pub last_price: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub volume: Option<i64>,
    pub change_price: Option<f64>,
    pub change_in_percent: Option<f64>,
    pub pe: Option<f64>,
    pub eps: Option<f64>,
    pub annual_dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    pub number_of_shares: Option<i64>,
    pub error_code: Option<String>,
}

/// Numeric quotation fields that can be pivoted into a price table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteField {
    LastPrice,
    ChangeInPercent,
    Eps,
    Pe,
    AnnualDividendYield,
    Volume,
}

impl QuoteField {
    pub fn value(self, quote: &Quotation) -> Option<f64> {
        match self {
            QuoteField::LastPrice => quote.last_price,
            QuoteField::ChangeInPercent => quote.change_in_percent,
            QuoteField::Eps => quote.eps,
            QuoteField::Pe => quote.pe,
            QuoteField::AnnualDividendYield => quote.annual_dividend_yield,
            QuoteField::Volume => quote.volume.map(|v| v as f64),
        }
        .filter(|v| v.is_finite())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            QuoteField::LastPrice => "last_price",
            QuoteField::ChangeInPercent => "change_in_percent",
            QuoteField::Eps => "eps",
            QuoteField::Pe => "pe",
            QuoteField::AnnualDividendYield => "annual_dividend_yield",
            QuoteField::Volume => "volume",
        }
    }
}

/// Value predicates applied to the quotations of a single trading day.
///
/// Missing values never satisfy a range bound.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuotationFilter {
    pub codes: Option<Vec<String>>,
    /// Inclusive lower bound on annual dividend yield.
    pub min_yield: Option<f64>,
    /// Inclusive upper bound on annual dividend yield.
    pub max_yield: Option<f64>,
    /// Inclusive lower bound on P/E.
    pub min_pe: Option<f64>,
    /// Exclusive upper bound on P/E.
    pub max_pe: Option<f64>,
    pub exclude_error_code: Option<String>,
    pub require_price: bool,
    pub require_volume: bool,
}

impl QuotationFilter {
    pub fn for_codes(codes: Vec<String>) -> Self {
        Self {
            codes: Some(codes),
            ..Default::default()
        }
    }

    pub fn matches(&self, quote: &Quotation) -> bool {
        if let Some(codes) = &self.codes {
            if !codes.iter().any(|c| c == &quote.asx_code) {
                return false;
            }
        }
        if self.min_yield.is_some() || self.max_yield.is_some() {
            let Some(dy) = quote.annual_dividend_yield else {
                return false;
            };
            if self.min_yield.is_some_and(|min| dy < min) || self.max_yield.is_some_and(|max| dy > max) {
                return false;
            }
        }
        if self.min_pe.is_some() || self.max_pe.is_some() {
            let Some(pe) = quote.pe else {
                return false;
            };
            if self.min_pe.is_some_and(|min| pe < min) || self.max_pe.is_some_and(|max| pe >= max) {
                return false;
            }
        }
        if let (Some(excluded), Some(code)) = (&self.exclude_error_code, &quote.error_code) {
            if excluded == code {
                return false;
            }
        }
        if self.require_price && quote.last_price.is_none() {
            return false;
        }
        if self.require_volume && quote.volume == Some(0) {
            return false;
        }
        true
    }
}

/// Result orderings used by the listing and search pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotationOrder {
    /// Yield descending (missing last), then code.
    YieldThenCode,
    /// Yield, last price and volume, all descending.
    YieldPriceVolume,
    Code,
}

fn desc_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

impl QuotationOrder {
    pub fn sort(self, quotes: &mut [Quotation]) {
        match self {
            QuotationOrder::YieldThenCode => quotes.sort_by(|a, b| {
                desc_missing_last(a.annual_dividend_yield, b.annual_dividend_yield)
                    .then_with(|| a.asx_code.cmp(&b.asx_code))
            }),
            QuotationOrder::YieldPriceVolume => quotes.sort_by(|a, b| {
                desc_missing_last(a.annual_dividend_yield, b.annual_dividend_yield)
                    .then_with(|| desc_missing_last(a.last_price, b.last_price))
                    .then_with(|| {
                        desc_missing_last(a.volume.map(|v| v as f64), b.volume.map(|v| v as f64))
                    })
            }),
            QuotationOrder::Code => quotes.sort_by(|a, b| a.asx_code.cmp(&b.asx_code)),
        }
    }
}

/// Normalises and checks a stock code taken from a URL.
pub fn validate_stock_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    let valid_len = (3..=6).contains(&code.len());
    if valid_len && code.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(code)
    } else {
        None
    }
}
