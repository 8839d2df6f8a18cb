//! Fundamentals over time: increasing series, monthly maxima and sector performance.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::quotes::{PriceMatrix, Quotation};

/// True when `values` has at least two points, never decreases and ends above where it began.
pub fn is_increasing(values: &[f64]) -> bool {
    match (values.first(), values.last()) {
        (Some(first), Some(last)) if values.len() >= 2 => {
            values.windows(2).all(|w| w[1] >= w[0]) && last > first
        }
        _ => false,
    }
}

/// Stocks of the matrix whose row is increasing, ascending by code.
pub fn increasing_only_filter(matrix: &PriceMatrix) -> Vec<String> {
    matrix
        .stocks()
        .filter(|stock| {
            let values: Vec<f64> = matrix
                .row(stock)
                .map(|row| row.values().copied().collect())
                .unwrap_or_default();
            is_increasing(&values)
        })
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyMaximum {
    /// `YYYY-MM`
    pub month: String,
    pub max_price: f64,
}

/// Highest last price seen in each calendar month, oldest month first.
pub fn monthly_maximum(quotes: &[Quotation]) -> Vec<MonthlyMaximum> {
    let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for quote in quotes {
        let Some(price) = quote.last_price.filter(|p| p.is_finite()) else {
            continue;
        };
        let key = (quote.fetch_date.year(), quote.fetch_date.month());
        months
            .entry(key)
            .and_modify(|max| *max = max.max(price))
            .or_insert(price);
    }
    months
        .into_iter()
        .map(|((year, month), max_price)| MonthlyMaximum {
            month: format!("{:04}-{:02}", year, month),
            max_price,
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectorPerformancePoint {
    pub sector: String,
    pub date: NaiveDate,
    /// Cumulative sum of the sector's average daily change.
    pub value: f64,
}

/// Cumulative average change per sector, over the stocks of each sector present in the matrix.
pub fn sector_performance(
    matrix: &PriceMatrix,
    memberships: &HashMap<String, String>,
) -> Vec<SectorPerformancePoint> {
    let mut sectors: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for stock in matrix.stocks() {
        if let Some(sector) = memberships.get(stock) {
            sectors.entry(sector.as_str()).or_default().push(stock);
        }
    }
    let mut points = Vec::new();
    for (sector, stocks) in sectors {
        let mut total = 0.0;
        for &date in matrix.dates() {
            let sum: f64 = stocks
                .iter()
                .map(|s| matrix.value(s, date).unwrap_or(0.0))
                .sum();
            total += sum / stocks.len() as f64;
            points.push(SectorPerformancePoint {
                sector: sector.to_string(),
                date,
                value: total,
            });
        }
    }
    points
}
