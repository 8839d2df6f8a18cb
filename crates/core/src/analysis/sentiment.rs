//! Market sentiment: per-day histograms of percentage change plus best/worst rankings.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::quotes::PriceMatrix;

/// Bin edges for daily percentage change. Each bin is `(lower, upper]`.
pub const SENTIMENT_BIN_EDGES: [f64; 18] = [
    -1000.0, -100.0, -10.0, -5.0, -3.0, -2.0, -1.0, -1e-6, 0.0, 1e-6, 1.0, 2.0, 3.0, 5.0, 10.0,
    25.0, 100.0, 1000.0,
];

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SentimentCell {
    pub date: NaiveDate,
    pub bin: String,
    pub count: usize,
}

/// A stock's total change over the window.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StockChange {
    pub asx_code: String,
    pub change: f64,
}

#[derive(Debug, Clone)]
pub struct Sentiment {
    pub matrix: PriceMatrix,
    pub cells: Vec<SentimentCell>,
    pub top: Vec<StockChange>,
    pub bottom: Vec<StockChange>,
    pub n_stocks: usize,
}

fn format_edge(edge: f64) -> String {
    if edge.fract() == 0.0 {
        format!("{}", edge as i64)
    } else {
        format!("{}", edge)
    }
}

/// Labels of every bin, lowest first.
pub fn bin_labels() -> Vec<String> {
    SENTIMENT_BIN_EDGES
        .windows(2)
        .map(|w| format!("({}, {}]", format_edge(w[0]), format_edge(w[1])))
        .collect()
}

/// Index of the bin holding `value`, if it is within the outer edges.
pub fn bin_index(value: f64) -> Option<usize> {
    SENTIMENT_BIN_EDGES
        .windows(2)
        .position(|w| value > w[0] && value <= w[1])
}

/// Bins every stock's change for every day and ranks stocks by total change.
///
/// `top` and `bottom` never hold more stocks than the matrix does.
pub fn sentiment_heatmap(matrix: PriceMatrix, n_top_bottom: usize) -> Sentiment {
    let labels = bin_labels();
    let mut cells = Vec::with_capacity(matrix.dates().len() * labels.len());
    for &date in matrix.dates() {
        let mut counts = vec![0usize; labels.len()];
        for stock in matrix.stocks() {
            if let Some(idx) = matrix.value(stock, date).and_then(bin_index) {
                counts[idx] += 1;
            }
        }
        cells.extend(
            counts
                .into_iter()
                .zip(labels.iter())
                .map(|(count, bin)| SentimentCell {
                    date,
                    bin: bin.clone(),
                    count,
                }),
        );
    }

    let mut totals: Vec<StockChange> = matrix
        .totals()
        .into_iter()
        .map(|(asx_code, change)| StockChange { asx_code, change })
        .collect();
    totals.sort_by(|a, b| {
        b.change
            .partial_cmp(&a.change)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.asx_code.cmp(&b.asx_code))
    });
    let n = n_top_bottom.min(totals.len());
    let top = totals[..n].to_vec();
    let bottom = totals.iter().rev().take(n).cloned().collect();
    let n_stocks = matrix.n_stocks();

    Sentiment {
        matrix,
        cells,
        top,
        bottom,
        n_stocks,
    }
}
