//! Sector momentum: how many stocks of a sector are up or down over a window.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::MOMENTUM_THRESHOLD;
use crate::quotes::PriceMatrix;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MomentumDay {
    pub date: NaiveDate,
    pub n_pos: usize,
    pub n_neg: usize,
    pub n_unchanged: usize,
}

/// One point of the company versus sector comparison.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SectorComparisonPoint {
    pub group: String,
    pub date: NaiveDate,
    pub value: f64,
}

#[derive(Debug, Clone, Default)]
pub struct SectorWalk {
    pub days: Vec<MomentumDay>,
    pub comparison: Vec<SectorComparisonPoint>,
    pub best_stock: Option<String>,
}

/// Stock with the largest total change; ties go to the lowest code.
fn best_performer(matrix: &PriceMatrix) -> Option<String> {
    matrix
        .totals()
        .into_iter()
        .fold(None::<(String, f64)>, |best, (stock, total)| match best {
            Some((_, best_total))
                if total.partial_cmp(&best_total).unwrap_or(Ordering::Equal)
                    != Ordering::Greater =>
            {
                best
            }
            _ => Some((stock, total)),
        })
        .map(|(stock, _)| stock)
}

/// Walks the days in order accumulating each sector stock's change (missing = 0).
///
/// A stock counts as up once its cumulative change reaches the threshold and as
/// down once it falls below the negative threshold.
pub fn sector_walk(matrix: &PriceMatrix, stock: &str, sector: &str) -> SectorWalk {
    let stocks: Vec<&str> = matrix.stocks().collect();
    if stocks.is_empty() {
        return SectorWalk::default();
    }
    let best_stock = best_performer(matrix);
    let best_label = best_stock
        .as_deref()
        .filter(|best| *best != stock)
        .map(|best| (best.to_string(), format!("{} (best in {})", best, sector)));

    let mut cumulative: BTreeMap<&str, f64> = stocks.iter().map(|s| (*s, 0.0)).collect();
    let mut days = Vec::with_capacity(matrix.dates().len());
    let mut comparison = Vec::new();
    for &date in matrix.dates() {
        for (code, total) in cumulative.iter_mut() {
            *total += matrix.value(code, date).unwrap_or(0.0);
        }
        let n_pos = cumulative
            .values()
            .filter(|v| **v >= MOMENTUM_THRESHOLD)
            .count();
        let n_neg = cumulative
            .values()
            .filter(|v| **v < -MOMENTUM_THRESHOLD)
            .count();
        days.push(MomentumDay {
            date,
            n_pos,
            n_neg,
            n_unchanged: stocks.len() - n_pos - n_neg,
        });

        comparison.push(SectorComparisonPoint {
            group: stock.to_string(),
            date,
            value: cumulative.get(stock).copied().unwrap_or(0.0),
        });
        comparison.push(SectorComparisonPoint {
            group: "sector_average".to_string(),
            date,
            value: cumulative.values().sum::<f64>() / stocks.len() as f64,
        });
        if let Some((best, label)) = &best_label {
            comparison.push(SectorComparisonPoint {
                group: label.clone(),
                date,
                value: cumulative.get(best.as_str()).copied().unwrap_or(0.0),
            });
        }
    }

    SectorWalk {
        days,
        comparison,
        best_stock,
    }
}

/// Trailing mean; `None` until a full window is available.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }
    let mut out = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    for (i, v) in values.iter().enumerate() {
        sum += v;
        if i >= window {
            sum -= values[i - window];
        }
        out.push((i + 1 >= window).then(|| sum / window as f64));
    }
    out
}
