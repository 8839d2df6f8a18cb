//! Chart specifications for the dashboard pages.

mod charts_builders;
mod charts_model;

pub use charts_builders::{
    make_momentum_plot, make_rsi_plot, make_sentiment_heatmap, plot_best_monthly_price_trend,
    plot_company_rank, plot_company_versus_sector, plot_key_stock_indicators,
    plot_market_wide_sector_performance, plot_portfolio,
};
pub use charts_model::{Chart, ChartKind, ChartPoint, ChartSeries, PortfolioCharts};
