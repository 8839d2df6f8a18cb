//! Page view models. Each handler answers with exactly one of these.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use super::messages::{Message, WithMessages};
use crate::analysis::{StockChange, Trend};
use crate::charts::{Chart, PortfolioCharts};
use crate::companies::{CompanyDetails, Security};
use crate::purchases::{PurchaseDefaults, VirtualPurchase};
use crate::quotes::Quotation;
use crate::utils::Page;

/// Heatmap plus best and worst performers over a window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentSummary {
    pub heatmap: Option<Chart>,
    pub heatmap_title: String,
    pub n_days: i64,
    pub n_stocks: usize,
    pub n_top_bottom: usize,
    pub best: Vec<StockChange>,
    pub worst: Vec<StockChange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPage<C> {
    pub title: String,
    pub action_url: String,
    pub criteria: Option<C>,
    /// Choices for the sector form; only the sector search fills this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<String>>,
    pub most_recent_date: Option<NaiveDate>,
    pub page: Page<Quotation>,
    pub watched: Vec<String>,
    pub sentiment: Option<SentimentSummary>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub title: String,
    pub most_recent_date: Option<NaiveDate>,
    pub page: Page<Quotation>,
    pub watched: Vec<String>,
    pub sentiment: Option<SentimentSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub virtual_purchases: Option<BTreeMap<String, Vec<VirtualPurchase>>>,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPage {
    pub asx_code: String,
    pub is_watched: bool,
    pub securities: Vec<Security>,
    pub company_details: Option<CompanyDetails>,
    pub latest_quote: Option<Quotation>,
    pub rsi_plot: Chart,
    pub sector_momentum_plot: Option<Chart>,
    pub sector_momentum_title: String,
    pub company_versus_sector_plot: Option<Chart>,
    pub company_versus_sector_title: String,
    pub key_indicators_plot: Option<Chart>,
    pub monthly_highest_price_plot: Chart,
    pub monthly_highest_price_plot_title: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketSentimentPage {
    pub title: String,
    pub sentiment: SentimentSummary,
    pub watched: Vec<String>,
    pub sector_performance: Option<Chart>,
    pub sector_performance_title: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendsPage {
    pub watchlist_trends: Vec<Trend>,
    pub trending_companies_plot: Option<Chart>,
    pub trending_companies_plot_title: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPage {
    pub title: String,
    pub portfolio_title: String,
    pub stock_title: String,
    pub charts: Option<PortfolioCharts>,
    pub messages: Vec<Message>,
}

/// The buy form with its pre-filled values.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseFormPage {
    pub title: String,
    pub asx_code: String,
    pub initial: Option<PurchaseDefaults>,
    pub messages: Vec<Message>,
}

/// An existing purchase, shown for editing or delete confirmation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchasePage {
    pub title: String,
    pub purchase: VirtualPurchase,
    pub messages: Vec<Message>,
}

macro_rules! impl_with_messages {
    ($($page:ty),* $(,)?) => {
        $(impl WithMessages for $page {
            fn messages_mut(&mut self) -> &mut Vec<Message> {
                &mut self.messages
            }
        })*
    };
}

impl_with_messages!(
    ListingPage,
    StockPage,
    MarketSentimentPage,
    TrendsPage,
    PortfolioPage,
    PurchaseFormPage,
    PurchasePage,
);

impl<C> WithMessages for SearchPage<C> {
    fn messages_mut(&mut self) -> &mut Vec<Message> {
        &mut self.messages
    }
}
