//! A stocks-by-trading-days table of a single quotation field.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::NaiveDate;

use super::quotes_model::{QuoteField, Quotation};

#[derive(Debug, Clone, PartialEq)]
pub struct PriceMatrix {
    field: QuoteField,
    dates: Vec<NaiveDate>,
    rows: BTreeMap<String, BTreeMap<NaiveDate, f64>>,
}

impl PriceMatrix {
    /// Pivots quotations into a table; rows and dates only exist where a value does.
    pub fn from_quotations<'a>(
        field: QuoteField,
        quotes: impl IntoIterator<Item = &'a Quotation>,
    ) -> Self {
        let mut dates = BTreeSet::new();
        let mut rows: BTreeMap<String, BTreeMap<NaiveDate, f64>> = BTreeMap::new();
        for quote in quotes {
            if let Some(value) = field.value(quote) {
                dates.insert(quote.fetch_date);
                rows.entry(quote.asx_code.clone())
                    .or_default()
                    .insert(quote.fetch_date, value);
            }
        }
        Self {
            field,
            dates: dates.into_iter().collect(),
            rows,
        }
    }

    pub fn field(&self) -> QuoteField {
        self.field
    }

    /// Trading days with at least one value, ascending.
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn stocks(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    pub fn n_stocks(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.dates.binary_search(&date).is_ok()
    }

    pub fn value(&self, stock: &str, date: NaiveDate) -> Option<f64> {
        self.rows.get(stock).and_then(|row| row.get(&date)).copied()
    }

    pub fn row(&self, stock: &str) -> Option<&BTreeMap<NaiveDate, f64>> {
        self.rows.get(stock)
    }

    /// Row sums with missing values counted as zero.
    pub fn totals(&self) -> Vec<(String, f64)> {
        self.rows
            .iter()
            .map(|(stock, row)| (stock.clone(), row.values().sum()))
            .collect()
    }

    /// Keeps only the given stocks; dates left without values are dropped.
    pub fn retain_stocks(&mut self, wanted: &HashSet<String>) {
        self.rows.retain(|stock, _| wanted.contains(stock));
        let remaining: BTreeSet<NaiveDate> = self
            .rows
            .values()
            .flat_map(|row| row.keys().copied())
            .collect();
        self.dates = remaining.into_iter().collect();
    }
}
