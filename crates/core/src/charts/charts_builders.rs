//! Builders turning analysis output into chart specifications.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::charts_model::{Chart, ChartKind, ChartSeries, PortfolioCharts};
use crate::analysis::{
    bin_labels, relative_strength_index, rolling_mean, MomentumDay, MonthlyMaximum,
    PortfolioRecord, RankPoint, SectorComparisonPoint, SectorPerformancePoint, Sentiment,
};
use crate::quotes::{QuoteField, Quotation};
use crate::utils::time_utils::format_ymd;

/// Groups `(group, x, y)` triples into series, keeping first-seen group order.
fn grouped_series<'a>(points: impl IntoIterator<Item = (&'a str, String, f64)>) -> Vec<ChartSeries> {
    let mut series: Vec<ChartSeries> = Vec::new();
    for (group, x, y) in points {
        match series.iter_mut().find(|s| s.name == group) {
            Some(s) => s.push(x, y),
            None => {
                let mut s = ChartSeries::new(group);
                s.push(x, y);
                series.push(s);
            }
        }
    }
    series
}

/// One series per change bin, counting stocks per day. `None` when nothing was binned.
pub fn make_sentiment_heatmap(sentiment: &Sentiment, title: &str) -> Option<Chart> {
    if sentiment.n_stocks == 0 || sentiment.cells.is_empty() {
        return None;
    }
    let mut series: Vec<ChartSeries> = bin_labels().into_iter().map(ChartSeries::new).collect();
    for cell in &sentiment.cells {
        if let Some(s) = series.iter_mut().find(|s| s.name == cell.bin) {
            s.push(format_ymd(cell.date), cell.count as f64);
        }
    }
    Some(
        Chart::new(ChartKind::Heatmap, title)
            .labels("date", "percentage change bin")
            .with_series(series),
    )
}

pub fn make_rsi_plot(stock: &str, quotes: &[Quotation], period: usize) -> Chart {
    let priced: Vec<(String, f64)> = quotes
        .iter()
        .filter_map(|q| q.last_price.map(|p| (format_ymd(q.fetch_date), p)))
        .collect();
    let prices: Vec<f64> = priced.iter().map(|(_, p)| *p).collect();
    let rsi = relative_strength_index(&prices, period);

    let mut price_series = ChartSeries::new("last_price");
    let mut rsi_series = ChartSeries::new("rsi");
    for ((date, price), rsi) in priced.into_iter().zip(rsi) {
        if let Some(value) = rsi {
            rsi_series.push(date.clone(), value);
        }
        price_series.push(date, price);
    }
    Chart::new(ChartKind::Line, format!("{} price and RSI", stock))
        .labels("date", "price")
        .with_series(vec![price_series, rsi_series])
}

pub fn make_momentum_plot(days: &[MomentumDay], sector: &str, window: usize) -> Chart {
    let n_pos: Vec<f64> = days.iter().map(|d| d.n_pos as f64).collect();
    let n_neg: Vec<f64> = days.iter().map(|d| d.n_neg as f64).collect();
    let mut pos_series = ChartSeries::new("n_pos");
    let mut neg_series = ChartSeries::new("n_neg");
    for ((day, pos), neg) in days
        .iter()
        .zip(rolling_mean(&n_pos, window))
        .zip(rolling_mean(&n_neg, window))
    {
        if let (Some(pos), Some(neg)) = (pos, neg) {
            pos_series.push(format_ymd(day.date), pos);
            neg_series.push(format_ymd(day.date), neg);
        }
    }
    Chart::new(ChartKind::Line, format!("{} sector momentum", sector))
        .labels("date", &format!("stocks ({}-day rolling mean)", window))
        .with_series(vec![pos_series, neg_series])
}

pub fn plot_company_versus_sector(
    points: &[SectorComparisonPoint],
    stock: &str,
    sector: &str,
) -> Chart {
    let series = grouped_series(
        points
            .iter()
            .map(|p| (p.group.as_str(), format_ymd(p.date), p.value)),
    );
    Chart::new(ChartKind::Line, format!("{} vs. {} performance", stock, sector))
        .labels("date", "cumulative change (%)")
        .with_series(series)
}

pub fn plot_key_stock_indicators(quotes: &[Quotation], stock: &str) -> Chart {
    let fields = [
        QuoteField::LastPrice,
        QuoteField::Pe,
        QuoteField::Eps,
        QuoteField::AnnualDividendYield,
    ];
    let series = fields
        .iter()
        .map(|field| {
            let mut s = ChartSeries::new(field.as_str());
            for q in quotes {
                if let Some(v) = field.value(q) {
                    s.push(format_ymd(q.fetch_date), v);
                }
            }
            s
        })
        .collect();
    Chart::new(ChartKind::Line, format!("{} key indicators", stock))
        .labels("date", "value")
        .with_series(series)
}

pub fn plot_best_monthly_price_trend(months: &[MonthlyMaximum]) -> Chart {
    let mut series = ChartSeries::new("max_price");
    for m in months {
        series.push(m.month.clone(), m.max_price);
    }
    Chart::new(ChartKind::Bar, "Maximum price each month trend")
        .labels("month", "price")
        .with_series(vec![series])
}

pub fn plot_market_wide_sector_performance(points: &[SectorPerformancePoint]) -> Chart {
    let series = grouped_series(
        points
            .iter()
            .map(|p| (p.sector.as_str(), format_ymd(p.date), p.value)),
    );
    Chart::new(ChartKind::Line, "180 day cumulative sector avg. performance")
        .labels("date", "cumulative change (%)")
        .with_series(series)
}

pub fn plot_company_rank(ranks: &[RankPoint]) -> Chart {
    let series = grouped_series(
        ranks
            .iter()
            .map(|r| (r.asx_code.as_str(), format_ymd(r.date), r.rank as f64)),
    );
    Chart::new(ChartKind::Line, "Trending watchlist companies by rank")
        .labels("date", "rank")
        .with_series(series)
}

/// Overall, per-stock worth and profit contribution charts. `None` without records.
pub fn plot_portfolio(records: &[PortfolioRecord]) -> Option<PortfolioCharts> {
    let last_day = records.iter().map(|r| r.date).max()?;

    let mut by_day: BTreeMap<String, (f64, f64, f64)> = BTreeMap::new();
    for r in records {
        by_day.insert(
            format_ymd(r.date),
            (r.portfolio_cost, r.portfolio_worth, r.portfolio_profit),
        );
    }
    let mut cost = ChartSeries::new("cost");
    let mut worth = ChartSeries::new("worth");
    let mut profit = ChartSeries::new("profit");
    for (day, (c, w, p)) in by_day {
        cost.push(day.clone(), c);
        worth.push(day.clone(), w);
        profit.push(day, p);
    }
    let overall = Chart::new(ChartKind::Line, "Overall")
        .labels("date", "AUD$")
        .with_series(vec![cost, worth, profit]);

    let stocks = Chart::new(ChartKind::Area, "Stock")
        .labels("date", "worth (AUD$)")
        .with_series(grouped_series(
            records
                .iter()
                .map(|r| (r.stock.as_str(), format_ymd(r.date), r.stock_worth)),
        ));

    let mut contributors: Vec<&PortfolioRecord> =
        records.iter().filter(|r| r.date == last_day).collect();
    contributors.sort_by(|a, b| {
        b.stock_profit
            .partial_cmp(&a.stock_profit)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.stock.cmp(&b.stock))
    });
    let mut contribution = ChartSeries::new("stock_profit");
    for r in contributors {
        contribution.push(r.stock.clone(), r.stock_profit);
    }
    let profit_contributors = Chart::new(ChartKind::Bar, "Profit contributors")
        .labels("stock", "profit (AUD$)")
        .with_series(vec![contribution]);

    Some(PortfolioCharts {
        overall,
        stocks,
        profit_contributors,
    })
}
