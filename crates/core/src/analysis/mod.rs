//! Analysis routines behind the dashboard pages.
//!
//! Everything here is a pure function over quotations or price tables;
//! loading the data is the caller's job.

pub mod fundamentals;
pub mod indicators;
pub mod momentum;
pub mod portfolio;
pub mod sentiment;
pub mod trends;

pub use fundamentals::{
    increasing_only_filter, is_increasing, monthly_maximum, sector_performance, MonthlyMaximum,
    SectorPerformancePoint,
};
pub use indicators::relative_strength_index;
pub use momentum::{rolling_mean, sector_walk, MomentumDay, SectorComparisonPoint, SectorWalk};
pub use portfolio::{portfolio_performance, PortfolioRecord};
pub use sentiment::{
    bin_index, bin_labels, sentiment_heatmap, Sentiment, SentimentCell, StockChange,
    SENTIMENT_BIN_EDGES,
};
pub use trends::{calculate_trends, linear_regression, rank_cumulative_change, LinearFit, RankPoint, Trend};
