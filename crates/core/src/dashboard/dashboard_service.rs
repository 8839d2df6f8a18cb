use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use log::debug;

use super::dashboard_traits::DashboardServiceTrait;
use super::messages::Message;
use super::pages::{
    ListingPage, MarketSentimentPage, PortfolioPage, PurchaseFormPage, SearchPage,
    SentimentSummary, StockPage, TrendsPage,
};
use super::search_criteria::{CompanySearch, SectorSearch, YieldSearch};
use crate::analysis::{
    calculate_trends, monthly_maximum, portfolio_performance, rank_cumulative_change,
    sector_performance, sector_walk, sentiment_heatmap, Sentiment,
};
use crate::charts::{
    make_momentum_plot, make_rsi_plot, make_sentiment_heatmap, plot_best_monthly_price_trend,
    plot_company_rank, plot_company_versus_sector, plot_key_stock_indicators,
    plot_market_wide_sector_performance, plot_portfolio,
};
use crate::companies::CompanyServiceTrait;
use crate::constants::{
    HEATMAP_N_DAYS, INVALID_CODE_ERROR, LISTING_N_DAYS, MARKET_SENTIMENT_N_DAYS,
    MOMENTUM_WINDOW, MONTHLY_PRICE_N_DAYS, N_TOP_BOTTOM, PAGE_SIZE, RSI_MIN_QUOTES, RSI_PERIOD,
    SECTOR_N_DAYS, SECTOR_PERFORMANCE_N_DAYS, TRENDS_N_DAYS,
};
use crate::errors::{Error, Result};
use crate::export::Dataset;
use crate::purchases::{PurchaseServiceTrait, VirtualPurchase};
use crate::quotes::{
    validate_stock_code, PriceMatrix, QuotationFilter, QuotationOrder, QuoteField, QuoteServiceTrait,
    Quotation,
};
use crate::utils::time_utils::{desired_dates, desired_dates_since};
use crate::utils::{Page, Paginator};
use crate::watchlist::WatchlistServiceTrait;

const NO_STOCKS: &str = "No stocks to report";

fn prices_current(date: NaiveDate) -> Message {
    Message::info(format!("Prices current as at {}.", date))
}

/// Assembles every dashboard page from the domain services.
pub struct DashboardService {
    quote_service: Arc<dyn QuoteServiceTrait>,
    company_service: Arc<dyn CompanyServiceTrait>,
    watchlist_service: Arc<dyn WatchlistServiceTrait>,
    purchase_service: Arc<dyn PurchaseServiceTrait>,
}

impl DashboardService {
    pub fn new(
        quote_service: Arc<dyn QuoteServiceTrait>,
        company_service: Arc<dyn CompanyServiceTrait>,
        watchlist_service: Arc<dyn WatchlistServiceTrait>,
        purchase_service: Arc<dyn PurchaseServiceTrait>,
    ) -> Self {
        Self {
            quote_service,
            company_service,
            watchlist_service,
            purchase_service,
        }
    }

    fn sentiment(
        &self,
        codes: Option<&[String]>,
        n_days: i64,
        today: NaiveDate,
    ) -> Result<Sentiment> {
        let dates = desired_dates(today, n_days);
        let matrix = self
            .quote_service
            .company_prices(codes, &dates, QuoteField::ChangeInPercent)?;
        Ok(sentiment_heatmap(matrix, N_TOP_BOTTOM))
    }

    fn summarise(sentiment: &Sentiment, heatmap_title: String, n_days: i64) -> SentimentSummary {
        SentimentSummary {
            heatmap: make_sentiment_heatmap(sentiment, &heatmap_title),
            heatmap_title,
            n_days,
            n_stocks: sentiment.n_stocks,
            n_top_bottom: N_TOP_BOTTOM,
            best: sentiment.top.clone(),
            worst: sentiment.bottom.clone(),
        }
    }

    fn empty_search<C>(
        &self,
        user_id: &str,
        title: &str,
        action_url: &str,
        sectors: Option<Vec<String>>,
    ) -> Result<SearchPage<C>> {
        Ok(SearchPage {
            title: title.to_string(),
            action_url: action_url.to_string(),
            criteria: None,
            sectors,
            most_recent_date: None,
            page: Page::empty(PAGE_SIZE),
            watched: self.watchlist_service.user_watchlist(user_id)?,
            sentiment: None,
            messages: Vec::new(),
        })
    }

    /// Shared tail of the yield and company searches: heatmap over every match.
    #[allow(clippy::too_many_arguments)]
    fn search_results<C>(
        &self,
        user_id: &str,
        title: &str,
        action_url: &str,
        criteria: C,
        rows: Vec<Quotation>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<SearchPage<C>> {
        let as_at = self.quote_service.latest_quotation_date()?;
        let mut messages = Vec::new();
        let sentiment = if rows.is_empty() {
            messages.push(Message::warning(NO_STOCKS));
            None
        } else {
            let codes: Vec<String> = rows.iter().map(|q| q.asx_code.clone()).collect();
            let sentiment = self.sentiment(Some(codes.as_slice()), HEATMAP_N_DAYS, today)?;
            let title = format!("Recent sentiment: {} total stocks", sentiment.n_stocks);
            Some(Self::summarise(&sentiment, title, HEATMAP_N_DAYS))
        };
        if let Some(date) = as_at {
            messages.push(prices_current(date));
        }
        Ok(SearchPage {
            title: title.to_string(),
            action_url: action_url.to_string(),
            criteria: Some(criteria),
            sectors: None,
            most_recent_date: as_at,
            page: Paginator::new(rows, PAGE_SIZE).page(page)?,
            watched: self.watchlist_service.user_watchlist(user_id)?,
            sentiment,
            messages,
        })
    }

    /// Common listing page over a set of codes.
    #[allow(clippy::too_many_arguments)]
    fn show_matching_companies(
        &self,
        user_id: &str,
        codes: Vec<String>,
        title: &str,
        heatmap_title: &str,
        virtual_purchases: Option<std::collections::BTreeMap<String, Vec<VirtualPurchase>>>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<ListingPage> {
        let watched = self.watchlist_service.user_watchlist(user_id)?;
        let most_recent_date = self.quote_service.latest_quotation_date()?;
        if codes.is_empty() {
            return Ok(ListingPage {
                title: title.to_string(),
                most_recent_date,
                page: Page::empty(PAGE_SIZE),
                watched,
                sentiment: None,
                virtual_purchases,
                messages: vec![Message::warning(NO_STOCKS)],
            });
        }
        debug!("Showing results for {} companies", codes.len());

        let (mut rows, _) = self.quote_service.latest_quotes(&codes)?;
        QuotationOrder::Code.sort(&mut rows);
        let page = Paginator::new(rows, PAGE_SIZE).page(page)?;

        let sentiment = self.sentiment(Some(codes.as_slice()), HEATMAP_N_DAYS, today)?;
        let summary = Self::summarise(
            &sentiment,
            format!("{}: past {} days", heatmap_title, HEATMAP_N_DAYS),
            HEATMAP_N_DAYS,
        );

        Ok(ListingPage {
            title: title.to_string(),
            most_recent_date,
            page,
            watched,
            sentiment: Some(summary),
            virtual_purchases,
            messages: most_recent_date.map(prices_current).into_iter().collect(),
        })
    }
}

impl DashboardServiceTrait for DashboardService {
    fn sector_search(
        &self,
        user_id: &str,
        criteria: Option<SectorSearch>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<SearchPage<SectorSearch>> {
        const TITLE: &str = "Find by company sector";
        const ACTION: &str = "/search/by-sector";
        let sectors = Some(self.company_service.all_sectors()?);
        let Some(criteria) = criteria else {
            return self.empty_search(user_id, TITLE, ACTION, sectors);
        };
        criteria.validate()?;
        let sector = criteria.sector.trim().to_string();

        let sector_stocks = self.company_service.all_sector_stocks(&sector)?;
        let sentiment = self.sentiment(Some(sector_stocks.as_slice()), HEATMAP_N_DAYS, today)?;
        let mut wanted: HashSet<String> = sector_stocks.into_iter().collect();
        if criteria.is_restricted() {
            let mut selected: HashSet<&str> = HashSet::new();
            if criteria.best10 {
                selected.extend(sentiment.top.iter().map(|s| s.asx_code.as_str()));
            }
            if criteria.worst10 {
                selected.extend(sentiment.bottom.iter().map(|s| s.asx_code.as_str()));
            }
            wanted.retain(|code| selected.contains(code.as_str()));
        }

        let as_at = self.quote_service.latest_quotation_date()?;
        debug!(
            "Looking for {} companies in {} as at {:?}",
            wanted.len(),
            sector,
            as_at
        );
        let rows = match as_at {
            Some(date) if !wanted.is_empty() => {
                let mut codes: Vec<String> = wanted.into_iter().collect();
                codes.sort();
                let filter = QuotationFilter {
                    exclude_error_code: Some(INVALID_CODE_ERROR.to_string()),
                    ..QuotationFilter::for_codes(codes)
                };
                self.quote_service
                    .find_quotations(date, &filter, QuotationOrder::YieldThenCode)?
            }
            _ => Vec::new(),
        };

        let mut messages = Vec::new();
        if rows.is_empty() {
            messages.push(Message::warning(NO_STOCKS));
        }
        if let Some(date) = as_at {
            messages.push(prices_current(date));
        }
        messages.push(Message::info(format!(
            "Only stocks from {} are shown.",
            sector
        )));

        let heatmap_title = format!("{}: past {} days", sector, HEATMAP_N_DAYS);
        Ok(SearchPage {
            title: TITLE.to_string(),
            action_url: ACTION.to_string(),
            criteria: Some(criteria),
            sectors,
            most_recent_date: as_at,
            page: Paginator::new(rows, PAGE_SIZE).page(page)?,
            watched: self.watchlist_service.user_watchlist(user_id)?,
            sentiment: Some(Self::summarise(&sentiment, heatmap_title, HEATMAP_N_DAYS)),
            messages,
        })
    }

    fn yield_search(
        &self,
        user_id: &str,
        criteria: Option<YieldSearch>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<SearchPage<YieldSearch>> {
        const TITLE: &str = "Find by dividend yield or P/E";
        const ACTION: &str = "/search/by-yield";
        let Some(criteria) = criteria else {
            return self.empty_search(user_id, TITLE, ACTION, None);
        };
        criteria.validate()?;
        let rows = match self.quote_service.latest_quotation_date()? {
            Some(date) => self.quote_service.find_quotations(
                date,
                &criteria.filter(),
                QuotationOrder::YieldThenCode,
            )?,
            None => Vec::new(),
        };
        self.search_results(user_id, TITLE, ACTION, criteria, rows, page, today)
    }

    fn company_search(
        &self,
        user_id: &str,
        criteria: Option<CompanySearch>,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<SearchPage<CompanySearch>> {
        const TITLE: &str = "Find by company name or activity";
        const ACTION: &str = "/search/by-company";
        let Some(criteria) = criteria else {
            return self.empty_search(user_id, TITLE, ACTION, None);
        };
        criteria.validate()?;
        let codes: Vec<String> = self
            .company_service
            .find_named_companies(&criteria.name, &criteria.activity)?
            .into_iter()
            .collect();
        let mut rows = if codes.is_empty() {
            Vec::new()
        } else {
            self.quote_service.latest_quotes(&codes)?.0
        };
        QuotationOrder::YieldThenCode.sort(&mut rows);
        self.search_results(user_id, TITLE, ACTION, criteria, rows, page, today)
    }

    fn all_stocks(&self, user_id: &str, page: Option<&str>) -> Result<ListingPage> {
        let Some(latest) = self.quote_service.latest_quotation_date()? else {
            return Err(Error::NotFound("No ASX price data available!".to_string()));
        };
        let filter = QuotationFilter {
            require_price: true,
            require_volume: true,
            ..Default::default()
        };
        let rows =
            self.quote_service
                .find_quotations(latest, &filter, QuotationOrder::YieldPriceVolume)?;
        Ok(ListingPage {
            title: "ASX stocks by dividend yield".to_string(),
            most_recent_date: Some(latest),
            page: Paginator::new(rows, PAGE_SIZE).get_page(page),
            watched: self.watchlist_service.user_watchlist(user_id)?,
            sentiment: None,
            virtual_purchases: None,
            messages: vec![prices_current(latest)],
        })
    }

    fn stock_detail(&self, user_id: &str, code: &str, today: NaiveDate) -> Result<StockPage> {
        let stock = validate_stock_code(code)
            .ok_or_else(|| Error::NotFound(format!("Invalid stock code: {}", code)))?;
        let quotes = self
            .quote_service
            .stock_quotes(&stock, &desired_dates(today, SECTOR_N_DAYS))?;
        let company_details = self.company_service.company_details(&stock)?;
        let mut messages = Vec::new();
        if company_details.is_none() {
            messages.push(Message::warning(format!(
                "No details available for {}",
                stock
            )));
        }
        // RSI needs a full window of prices
        if quotes.len() < RSI_MIN_QUOTES {
            return Err(Error::NotFound(format!(
                "Insufficient price quotes for {} - only {}",
                stock,
                quotes.len()
            )));
        }
        let rsi_plot = make_rsi_plot(&stock, &quotes, RSI_PERIOD);

        let sector = company_details
            .as_ref()
            .and_then(|cd| cd.sector_name.clone())
            .filter(|s| !s.trim().is_empty());
        let sector_label = sector.clone().unwrap_or_else(|| "Unknown".to_string());
        let sector_stocks = match &sector {
            Some(name) => self.company_service.all_sector_stocks(name)?,
            None => Vec::new(),
        };

        let (mut sector_momentum_plot, mut company_versus_sector_plot, mut key_indicators_plot) =
            (None, None, None);
        if !sector_stocks.is_empty() {
            let dates = desired_dates(today, SECTOR_N_DAYS + MOMENTUM_WINDOW as i64);
            let matrix = self.quote_service.company_prices(
                Some(sector_stocks.as_slice()),
                &dates,
                QuoteField::ChangeInPercent,
            )?;
            if !matrix.is_empty() {
                let walk = sector_walk(&matrix, &stock, &sector_label);
                sector_momentum_plot =
                    Some(make_momentum_plot(&walk.days, &sector_label, MOMENTUM_WINDOW));
                company_versus_sector_plot = Some(plot_company_versus_sector(
                    &walk.comparison,
                    &stock,
                    &sector_label,
                ));
            }
            key_indicators_plot = Some(plot_key_stock_indicators(&quotes, &stock));
        }

        let monthly_quotes = self
            .quote_service
            .stock_quotes(&stock, &desired_dates(today, MONTHLY_PRICE_N_DAYS))?;
        let monthly_highest_price_plot =
            plot_best_monthly_price_trend(&monthly_maximum(&monthly_quotes));

        Ok(StockPage {
            is_watched: self.watchlist_service.is_watched(user_id, &stock)?,
            securities: self.company_service.securities(&stock)?,
            latest_quote: quotes.last().cloned(),
            company_details,
            rsi_plot,
            sector_momentum_plot,
            sector_momentum_title: format!(
                "{} sector stocks: {} day performance",
                sector_label, SECTOR_N_DAYS
            ),
            company_versus_sector_plot,
            company_versus_sector_title: format!("{} vs. {} performance", stock, sector_label),
            key_indicators_plot,
            monthly_highest_price_plot,
            monthly_highest_price_plot_title: "Maximum price each month trend".to_string(),
            asx_code: stock,
            messages,
        })
    }

    fn etfs(&self, user_id: &str, page: Option<&str>, today: NaiveDate) -> Result<ListingPage> {
        let codes = self.company_service.all_etfs()?;
        self.show_matching_companies(
            user_id,
            codes,
            &format!("Exchange Traded funds over past {} days", LISTING_N_DAYS),
            "Sentiment for ETFs",
            None,
            page,
            today,
        )
    }

    fn increasing_eps(
        &self,
        user_id: &str,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<ListingPage> {
        let codes = self
            .quote_service
            .increasing_only(QuoteField::Eps, &desired_dates(today, LISTING_N_DAYS))?;
        self.show_matching_companies(
            user_id,
            codes,
            &format!("Stocks with increasing EPS over past {} days", LISTING_N_DAYS),
            "Sentiment for selected stocks",
            None,
            page,
            today,
        )
    }

    fn increasing_yield(
        &self,
        user_id: &str,
        page: Option<&str>,
        today: NaiveDate,
    ) -> Result<ListingPage> {
        let codes = self.quote_service.increasing_only(
            QuoteField::AnnualDividendYield,
            &desired_dates(today, LISTING_N_DAYS),
        )?;
        self.show_matching_companies(
            user_id,
            codes,
            &format!("Stocks with increasing yield over past {} days", LISTING_N_DAYS),
            "Sentiment for selected stocks",
            None,
            page,
            today,
        )
    }

    fn watched(&self, user_id: &str, page: Option<&str>, today: NaiveDate) -> Result<ListingPage> {
        let codes = self.watchlist_service.user_watchlist(user_id)?;
        let purchases = self.purchase_service.user_purchases(user_id)?;
        self.show_matching_companies(
            user_id,
            codes,
            "Stocks you are watching",
            "Watched stock recent sentiment",
            Some(purchases),
            page,
            today,
        )
    }

    fn market_sentiment(&self, user_id: &str, today: NaiveDate) -> Result<MarketSentimentPage> {
        let title = format!("Market sentiment over past {} days", MARKET_SENTIMENT_N_DAYS);
        let sentiment = self.sentiment(None, MARKET_SENTIMENT_N_DAYS, today)?;
        let mut messages = Vec::new();
        if sentiment.n_stocks == 0 {
            messages.push(Message::warning(NO_STOCKS));
        }

        let matrix = self.quote_service.company_prices(
            None,
            &desired_dates(today, SECTOR_PERFORMANCE_N_DAYS),
            QuoteField::ChangeInPercent,
        )?;
        let memberships = self.company_service.sector_memberships()?;
        let points = sector_performance(&matrix, &memberships);
        let sector_performance_plot =
            (!points.is_empty()).then(|| plot_market_wide_sector_performance(&points));

        Ok(MarketSentimentPage {
            sentiment: Self::summarise(&sentiment, title.clone(), MARKET_SENTIMENT_N_DAYS),
            title,
            watched: self.watchlist_service.user_watchlist(user_id)?,
            sector_performance: sector_performance_plot,
            sector_performance_title: format!(
                "{} day cumulative sector avg. performance",
                SECTOR_PERFORMANCE_N_DAYS
            ),
            messages,
        })
    }

    fn trends(&self, user_id: &str, today: NaiveDate) -> Result<TrendsPage> {
        let title = format!(
            "Trending watchlist companies by rank (past {} days)",
            TRENDS_N_DAYS
        );
        let watched = self.watchlist_service.user_watchlist(user_id)?;
        if watched.is_empty() {
            return Ok(TrendsPage {
                watchlist_trends: Vec::new(),
                trending_companies_plot: None,
                trending_companies_plot_title: title,
                messages: vec![Message::warning("No watched stocks to report")],
            });
        }
        let mut matrix = self.quote_service.company_prices(
            Some(watched.as_slice()),
            &desired_dates(today, TRENDS_N_DAYS),
            QuoteField::ChangeInPercent,
        )?;
        let trends = calculate_trends(&matrix, &watched);
        let trending: HashSet<String> = trends.iter().map(|t| t.asx_code.clone()).collect();
        // Only trending stocks are ranked; ranking the whole watchlist is unreadable.
        matrix.retain_stocks(&trending);
        let ranks = rank_cumulative_change(&matrix);
        let mut messages = Vec::new();
        if trends.is_empty() {
            messages.push(Message::info("None of your watched stocks are trending."));
        }
        Ok(TrendsPage {
            watchlist_trends: trends,
            trending_companies_plot: (!ranks.is_empty()).then(|| plot_company_rank(&ranks)),
            trending_companies_plot_title: title,
            messages,
        })
    }

    fn portfolio(&self, user_id: &str, today: NaiveDate) -> Result<PortfolioPage> {
        let grouped = self.purchase_service.user_purchases(user_id)?;
        let stocks: Vec<String> = grouped.keys().cloned().collect();
        let purchases: Vec<VirtualPurchase> = grouped.into_values().flatten().collect();

        let mut page = PortfolioPage {
            title: "Portfolio performance".to_string(),
            portfolio_title: "Overall".to_string(),
            stock_title: "Stock".to_string(),
            charts: None,
            messages: Vec::new(),
        };
        let Some(earliest) = purchases.iter().map(|p| p.buy_date).min() else {
            page.messages
                .push(Message::warning("No virtual purchases to report"));
            return Ok(page);
        };

        let dates = desired_dates_since(earliest, today);
        let prices = self
            .quote_service
            .company_prices(Some(stocks.as_slice()), &dates, QuoteField::LastPrice)?;
        let records = portfolio_performance(&purchases, &prices, &dates);
        page.charts = plot_portfolio(&records);
        if page.charts.is_none() {
            page.messages
                .push(Message::warning("No price data for your virtual purchases"));
        }
        Ok(page)
    }

    fn buy_form(&self, code: &str, amount: Option<f64>) -> Result<PurchaseFormPage> {
        let stock = validate_stock_code(code)
            .ok_or_else(|| Error::NotFound(format!("Invalid stock code: {}", code)))?;
        let initial = self.purchase_service.purchase_defaults(&stock, amount)?;
        let mut messages = Vec::new();
        if initial.is_none() {
            messages.push(Message::warning(format!(
                "Cannot buy {} as its price is zero/unknown",
                stock
            )));
        }
        Ok(PurchaseFormPage {
            title: format!("Add {} purchase to watchlist", stock),
            asx_code: stock,
            initial,
            messages,
        })
    }

    fn dataset(&self, dataset: Dataset, today: NaiveDate) -> Result<PriceMatrix> {
        match dataset {
            Dataset::MarketSentiment => self.quote_service.company_prices(
                None,
                &desired_dates(today, MARKET_SENTIMENT_N_DAYS),
                QuoteField::ChangeInPercent,
            ),
        }
    }
}
