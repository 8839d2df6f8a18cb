//! Linear trends and rankings over cumulative percentage change.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::TREND_MIN_R_SQUARED;
use crate::quotes::PriceMatrix;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

/// Ordinary least squares; `None` when x has no spread.
pub fn linear_regression(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let nf = n as f64;
    let mean_x = xs[..n].iter().sum::<f64>() / nf;
    let mean_y = ys[..n].iter().sum::<f64>() / nf;
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 {
        return None;
    }
    let slope = sxy / sxx;
    let r_squared = if syy == 0.0 {
        0.0
    } else {
        (sxy * sxy) / (sxx * syy)
    };
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r_squared,
    })
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Trend {
    pub asx_code: String,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n_points: usize,
}

/// Cumulative change of one stock at each day it has a value, indexed by day position.
fn cumulative_points(matrix: &PriceMatrix, stock: &str) -> (Vec<f64>, Vec<f64>) {
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    let mut total = 0.0;
    for (i, date) in matrix.dates().iter().enumerate() {
        if let Some(value) = matrix.value(stock, *date) {
            total += value;
            xs.push(i as f64);
            ys.push(total);
        }
    }
    (xs, ys)
}

/// Stocks whose cumulative change follows a line well enough, steepest first.
pub fn calculate_trends(matrix: &PriceMatrix, stocks: &[String]) -> Vec<Trend> {
    let mut trends: Vec<Trend> = stocks
        .iter()
        .filter_map(|stock| {
            let (xs, ys) = cumulative_points(matrix, stock);
            let fit = linear_regression(&xs, &ys)?;
            let trending = fit.r_squared >= TREND_MIN_R_SQUARED && fit.slope != 0.0;
            trending.then(|| Trend {
                asx_code: stock.clone(),
                slope: fit.slope,
                intercept: fit.intercept,
                r_squared: fit.r_squared,
                n_points: xs.len(),
            })
        })
        .collect();
    trends.sort_by(|a, b| {
        b.slope
            .partial_cmp(&a.slope)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.asx_code.cmp(&b.asx_code))
    });
    trends
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RankPoint {
    pub asx_code: String,
    pub date: NaiveDate,
    pub rank: usize,
}

/// Daily rank of each stock by cumulative change, 1 being the best.
pub fn rank_cumulative_change(matrix: &PriceMatrix) -> Vec<RankPoint> {
    let stocks: Vec<&str> = matrix.stocks().collect();
    let mut totals = vec![0.0f64; stocks.len()];
    let mut points = Vec::with_capacity(stocks.len() * matrix.dates().len());
    for &date in matrix.dates() {
        for (i, stock) in stocks.iter().enumerate() {
            totals[i] += matrix.value(stock, date).unwrap_or(0.0);
        }
        let mut order: Vec<usize> = (0..stocks.len()).collect();
        order.sort_by(|&a, &b| {
            totals[b]
                .partial_cmp(&totals[a])
                .unwrap_or(Ordering::Equal)
                .then_with(|| stocks[a].cmp(stocks[b]))
        });
        points.extend(order.into_iter().enumerate().map(|(pos, i)| RankPoint {
            asx_code: stocks[i].to_string(),
            date,
            rank: pos + 1,
        }));
    }
    points
}
