#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{Duration, NaiveDate};

    use crate::companies::{Security, ETF_SECURITY_NAME};
    use crate::dashboard::{
        CompanySearch, DashboardServiceTrait, MessageLevel, SectorSearch, YieldSearch,
    };
    use crate::purchases::VirtualPurchase;
    use crate::quotes::Quotation;
    use crate::test_support::{details, quote, ymd, Fixture, MockWatchlistRepository};

    fn today() -> NaiveDate {
        ymd(2024, 6, 30)
    }

    /// `n` consecutive days of quotes ending today.
    fn history(code: &str, n: i64, price: f64, dy: f64, change: f64) -> Vec<Quotation> {
        (0..n)
            .map(|i| quote(code, today() - Duration::days(n - 1 - i), price, dy, change))
            .collect()
    }

    fn market() -> Fixture {
        let mut quotes = history("ANZ", 20, 25.0, 5.0, 0.5);
        quotes.extend(history("CBA", 20, 100.0, 4.0, 1.0));
        quotes.extend(history("NAB", 20, 30.0, 5.0, -1.0));
        quotes.extend(history("BHP", 20, 40.0, 6.0, 0.2));
        quotes.extend(history("NEW", 5, 1.0, 0.0, 0.0));
        Fixture::new(
            quotes,
            vec![
                details("ANZ", "ANZ Group Holdings", Some("Banks")),
                details("CBA", "Commonwealth Bank of Australia", Some("Banks")),
                details("NAB", "National Australia Bank", Some("Banks")),
                details("BHP", "BHP Group", Some("Materials")),
            ],
        )
    }

    fn texts(messages: &[crate::dashboard::Message]) -> Vec<String> {
        messages.iter().map(|m| m.text.clone()).collect()
    }

    #[test]
    fn search_without_criteria_is_empty_and_silent() {
        let dashboard = market().dashboard();
        let page = dashboard.yield_search("u1", None, None, today()).unwrap();
        assert!(page.page.is_empty());
        assert!(page.messages.is_empty());
        assert!(page.sentiment.is_none());

        let page = dashboard.sector_search("u1", None, None, today()).unwrap();
        assert_eq!(
            page.sectors,
            Some(vec!["Banks".to_string(), "Materials".to_string()])
        );
        assert!(page.messages.is_empty());
    }

    #[test]
    fn yield_search_with_equal_bounds_returns_exact_yield() {
        let dashboard = market().dashboard();
        let criteria = YieldSearch {
            min_yield: 5.0,
            max_yield: 5.0,
            ..Default::default()
        };
        let page = dashboard
            .yield_search("u1", Some(criteria), None, today())
            .unwrap();
        let codes: Vec<&str> = page.page.items.iter().map(|q| q.asx_code.as_str()).collect();
        assert_eq!(codes, vec!["ANZ", "NAB"]);
        let sentiment = page.sentiment.unwrap();
        assert_eq!(sentiment.heatmap_title, "Recent sentiment: 2 total stocks");
        assert!(texts(&page.messages).contains(&"Prices current as at 2024-06-30.".to_string()));
    }

    #[test]
    fn yield_search_without_matches_warns() {
        let dashboard = market().dashboard();
        let criteria = YieldSearch {
            min_yield: 50.0,
            ..Default::default()
        };
        let page = dashboard
            .yield_search("u1", Some(criteria), None, today())
            .unwrap();
        assert!(page.page.is_empty());
        assert!(page.sentiment.is_none());
        assert_eq!(page.messages[0].level, MessageLevel::Warning);
        assert_eq!(page.messages[0].text, "No stocks to report");
    }

    #[test]
    fn sector_search_restricts_to_best_performers() {
        let dashboard = market().dashboard();
        let all = dashboard
            .sector_search(
                "u1",
                Some(SectorSearch {
                    sector: "Banks".to_string(),
                    ..Default::default()
                }),
                None,
                today(),
            )
            .unwrap();
        assert_eq!(all.page.info.count, 3);
        assert!(texts(&all.messages).contains(&"Only stocks from Banks are shown.".to_string()));
        assert_eq!(
            all.sentiment.as_ref().unwrap().heatmap_title,
            "Banks: past 30 days"
        );

        let best = dashboard
            .sector_search(
                "u1",
                Some(SectorSearch {
                    sector: "Banks".to_string(),
                    best10: true,
                    worst10: false,
                }),
                None,
                today(),
            )
            .unwrap();
        // fewer stocks than the ranking size, so "best" is the whole sector
        let codes: Vec<&str> = best.page.items.iter().map(|q| q.asx_code.as_str()).collect();
        assert_eq!(codes, vec!["ANZ", "NAB", "CBA"]);
    }

    #[test]
    fn company_search_matches_name_or_activity() {
        let dashboard = market().dashboard();
        let page = dashboard
            .company_search(
                "u1",
                Some(CompanySearch {
                    name: "bank".to_string(),
                    activity: String::new(),
                }),
                None,
                today(),
            )
            .unwrap();
        assert_eq!(page.title, "Find by company name or activity");
        let mut codes: Vec<&str> = page.page.items.iter().map(|q| q.asx_code.as_str()).collect();
        codes.sort();
        assert_eq!(codes, vec!["CBA", "NAB"]);
    }

    #[test]
    fn strict_paging_rejects_bad_page() {
        let dashboard = market().dashboard();
        let criteria = YieldSearch::default();
        let err = dashboard
            .yield_search("u1", Some(criteria), Some("9"), today())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn all_stocks_is_tolerant_and_needs_data() {
        let dashboard = market().dashboard();
        let page = dashboard.all_stocks("u1", Some("99")).unwrap();
        assert_eq!(page.page.info.number, 1);
        assert_eq!(page.page.items[0].asx_code, "BHP");
        assert_eq!(page.title, "ASX stocks by dividend yield");

        let empty = Fixture::new(vec![], vec![]).dashboard();
        let err = empty.all_stocks("u1", None).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "No ASX price data available!");
    }

    #[test]
    fn all_stocks_keeps_unknown_volume_but_drops_zero_volume() {
        let mut quotes = history("ANZ", 3, 25.0, 5.0, 0.5);
        let mut unknown = quote("XYZ", today(), 2.0, 1.0, 0.0);
        unknown.volume = None;
        let mut idle = quote("IDL", today(), 3.0, 2.0, 0.0);
        idle.volume = Some(0);
        let mut unpriced = quote("NOP", today(), 1.0, 3.0, 0.0);
        unpriced.last_price = None;
        quotes.extend([unknown, idle, unpriced]);

        let dashboard = Fixture::new(quotes, vec![]).dashboard();
        let page = dashboard.all_stocks("u1", None).unwrap();
        let codes: Vec<&str> = page.page.items.iter().map(|q| q.asx_code.as_str()).collect();
        assert_eq!(codes, vec!["ANZ", "XYZ"]);
    }

    #[test]
    fn stock_with_short_history_is_not_found() {
        let dashboard = market().dashboard();
        let err = dashboard.stock_detail("u1", "NEW", today()).unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Insufficient price quotes for NEW - only 5");
        assert!(dashboard
            .stock_detail("u1", "A$", today())
            .unwrap_err()
            .is_not_found());
    }

    #[test]
    fn stock_detail_builds_sector_charts() {
        let dashboard = market().dashboard();
        let page = dashboard.stock_detail("u1", "anz", today()).unwrap();
        assert_eq!(page.asx_code, "ANZ");
        assert!(page.sector_momentum_plot.is_some());
        assert!(page.key_indicators_plot.is_some());
        let cvs = page.company_versus_sector_plot.unwrap();
        assert!(cvs.series("CBA (best in Banks)").is_some());
        assert_eq!(page.company_versus_sector_title, "ANZ vs. Banks performance");
        assert!(page.messages.is_empty());
    }

    #[test]
    fn stock_without_details_warns_and_skips_sector() {
        let mut quotes = history("XYZ", 15, 2.0, 1.0, 0.1);
        quotes.extend(history("ANZ", 15, 25.0, 5.0, 0.5));
        let dashboard = Fixture::new(quotes, vec![]).dashboard();
        let page = dashboard.stock_detail("u1", "XYZ", today()).unwrap();
        assert_eq!(texts(&page.messages), vec!["No details available for XYZ"]);
        assert!(page.sector_momentum_plot.is_none());
        assert!(page.company_versus_sector_plot.is_none());
        assert!(page.key_indicators_plot.is_none());
    }

    #[test]
    fn empty_listing_warns_instead_of_failing() {
        let dashboard = market().dashboard();
        let page = dashboard.etfs("u1", None, today()).unwrap();
        assert!(page.page.is_empty());
        assert_eq!(texts(&page.messages), vec!["No stocks to report"]);
    }

    #[test]
    fn etf_listing_uses_security_names() {
        let fixture = market();
        fixture.companies.securities.lock().unwrap().push(Security {
            asx_code: "BHP".to_string(),
            asx_isin_code: "AU000000BHP4".to_string(),
            company_name: "BHP".to_string(),
            security_name: format!("{} UNITS", ETF_SECURITY_NAME),
        });
        let page = fixture.dashboard().etfs("u1", None, today()).unwrap();
        assert_eq!(page.title, "Exchange Traded funds over past 300 days");
        assert_eq!(page.page.items.len(), 1);
        assert_eq!(
            page.sentiment.unwrap().heatmap_title,
            "Sentiment for ETFs: past 30 days"
        );
    }

    #[test]
    fn watched_listing_includes_purchases() {
        let fixture = Fixture {
            watchlist: Arc::new(MockWatchlistRepository::watching("u1", &["CBA"])),
            ..market()
        };
        fixture.purchases.purchases.lock().unwrap().push(VirtualPurchase {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            asx_code: "CBA".to_string(),
            buy_date: ymd(2024, 6, 20),
            price_at_buy_date: 100.0,
            amount: 1000.0,
            n: 10,
        });
        let page = fixture.dashboard().watched("u1", None, today()).unwrap();
        assert_eq!(page.watched, vec!["CBA".to_string()]);
        assert_eq!(page.page.items.len(), 1);
        assert_eq!(page.virtual_purchases.unwrap()["CBA"].len(), 1);
    }

    #[test]
    fn portfolio_without_purchases_warns() {
        let page = market().dashboard().portfolio("u1", today()).unwrap();
        assert!(page.charts.is_none());
        assert_eq!(texts(&page.messages), vec!["No virtual purchases to report"]);
    }

    #[test]
    fn portfolio_with_purchase_has_charts() {
        let fixture = market();
        fixture.purchases.purchases.lock().unwrap().push(VirtualPurchase {
            id: "p1".to_string(),
            user_id: "u1".to_string(),
            asx_code: "CBA".to_string(),
            buy_date: ymd(2024, 6, 25),
            price_at_buy_date: 100.0,
            amount: 1000.0,
            n: 10,
        });
        let page = fixture.dashboard().portfolio("u1", today()).unwrap();
        let charts = page.charts.unwrap();
        // the walk starts on the buy date and every day to the 30th has a price
        assert_eq!(charts.overall.series("cost").unwrap().points.len(), 6);
    }

    #[test]
    fn buy_form_defaults_and_zero_price_warning() {
        let dashboard = market().dashboard();
        let form = dashboard.buy_form("cba", None).unwrap();
        let initial = form.initial.unwrap();
        assert_eq!(initial.n, 50);
        assert_eq!(form.title, "Add CBA purchase to watchlist");

        let mut quotes = history("ANZ", 2, 25.0, 5.0, 0.5);
        quotes.push(quote("ZRO", today(), 0.0, 0.0, 0.0));
        let form = Fixture::new(quotes, vec![])
            .dashboard()
            .buy_form("ZRO", None)
            .unwrap();
        assert!(form.initial.is_none());
        assert_eq!(
            texts(&form.messages),
            vec!["Cannot buy ZRO as its price is zero/unknown"]
        );
    }

    #[test]
    fn trends_rank_steady_movers() {
        let fixture = Fixture {
            watchlist: Arc::new(MockWatchlistRepository::watching("u1", &["CBA", "NAB"])),
            ..market()
        };
        let page = fixture.dashboard().trends("u1", today()).unwrap();
        let codes: Vec<&str> = page
            .watchlist_trends
            .iter()
            .map(|t| t.asx_code.as_str())
            .collect();
        assert_eq!(codes, vec!["CBA", "NAB"]);
        assert!(page.trending_companies_plot.is_some());
    }

    #[test]
    fn market_sentiment_and_dataset_cover_window() {
        let dashboard = market().dashboard();
        let page = dashboard.market_sentiment("u1", today()).unwrap();
        assert_eq!(page.title, "Market sentiment over past 21 days");
        assert_eq!(page.sentiment.n_stocks, 5);
        assert!(page.sector_performance.is_some());

        let table = dashboard
            .dataset(crate::export::Dataset::MarketSentiment, today())
            .unwrap();
        assert_eq!(table.n_stocks(), 5);
        assert_eq!(table.dates().len(), 20);
    }
}
