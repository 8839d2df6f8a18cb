/// Rows per page for every paginated listing
pub const PAGE_SIZE: usize = 50;

/// Number of best/worst performers reported alongside a heatmap
pub const N_TOP_BOTTOM: usize = 20;

/// Days of history behind the sentiment heatmap on search and listing pages
pub const HEATMAP_N_DAYS: i64 = 30;

/// RSI requires a full window of prices before it can be plotted
pub const RSI_MIN_QUOTES: usize = 14;

/// Smoothing period of the relative strength index
pub const RSI_PERIOD: usize = 14;

/// Days of sector history on the stock page
pub const SECTOR_N_DAYS: i64 = 90;

/// Rolling window (in trading days) for sector momentum
pub const MOMENTUM_WINDOW: usize = 14;

/// Cumulative change (percent) at which a stock counts as up/down for momentum
pub const MOMENTUM_THRESHOLD: f64 = 5.0;

/// Days of price history behind the monthly maximum price chart
pub const MONTHLY_PRICE_N_DAYS: i64 = 600;

/// Days of history behind the increasing EPS/yield and ETF listings
pub const LISTING_N_DAYS: i64 = 300;

/// Days of history behind the watchlist trends page
pub const TRENDS_N_DAYS: i64 = 300;

/// Minimum coefficient of determination for a watched stock to be trending
pub const TREND_MIN_R_SQUARED: f64 = 0.7;

/// Days of history behind the market sentiment page and dataset
pub const MARKET_SENTIMENT_N_DAYS: i64 = 21;

/// Days of history behind the market-wide sector performance chart
pub const SECTOR_PERFORMANCE_N_DAYS: i64 = 180;

/// Default target dollar amount for a virtual purchase
pub const DEFAULT_PURCHASE_AMOUNT: f64 = 5000.0;

/// Prices below this are treated as zero/unknown
pub const MIN_PRICE: f64 = 1e-6;

/// Error code recorded against quotations for delisted or unknown codes
pub const INVALID_CODE_ERROR: &str = "id-or-code-invalid";

/// Stock whose trading days define the calendar
pub const DEFAULT_REFERENCE_STOCK: &str = "ANZ";
