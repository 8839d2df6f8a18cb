//! Day-by-day value of a user's virtual purchases.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::purchases::VirtualPurchase;
use crate::quotes::PriceMatrix;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRecord {
    pub date: NaiveDate,
    pub stock: String,
    pub portfolio_cost: f64,
    pub portfolio_worth: f64,
    pub portfolio_profit: f64,
    pub stock_cost: f64,
    pub stock_worth: f64,
    pub stock_profit: f64,
}

#[derive(Default)]
struct Holding {
    count: i64,
    cost: f64,
}

/// Replays `purchases` over `dates` against last prices.
///
/// Days without any price are skipped. A purchase is applied on the first
/// trading day on or after its buy date. One record is emitted per stock that
/// has a price on the day.
pub fn portfolio_performance(
    purchases: &[VirtualPurchase],
    prices: &PriceMatrix,
    dates: &[NaiveDate],
) -> Vec<PortfolioRecord> {
    let stocks: BTreeSet<&str> = purchases.iter().map(|p| p.asx_code.as_str()).collect();
    let mut pending: Vec<&VirtualPurchase> = purchases.iter().collect();
    pending.sort_by_key(|p| p.buy_date);

    let mut holdings: BTreeMap<&str, Holding> = BTreeMap::new();
    let mut portfolio_cost = 0.0;
    let mut applied = 0;
    let mut records = Vec::new();

    for &day in dates {
        if !prices.has_date(day) {
            continue;
        }
        while applied < pending.len() && pending[applied].buy_date <= day {
            let purchase = pending[applied];
            portfolio_cost += purchase.amount;
            let holding = holdings.entry(purchase.asx_code.as_str()).or_default();
            holding.count += purchase.n;
            holding.cost += purchase.amount;
            applied += 1;
        }

        let portfolio_worth: f64 = holdings
            .iter()
            .filter_map(|(stock, h)| prices.value(stock, day).map(|p| p * h.count as f64))
            .sum();

        for &stock in &stocks {
            let Some(price) = prices.value(stock, day) else {
                continue;
            };
            let (count, stock_cost) = holdings
                .get(stock)
                .map(|h| (h.count, h.cost))
                .unwrap_or((0, 0.0));
            let stock_worth = price * count as f64;
            records.push(PortfolioRecord {
                date: day,
                stock: stock.to_string(),
                portfolio_cost,
                portfolio_worth,
                portfolio_profit: portfolio_worth - portfolio_cost,
                stock_cost,
                stock_worth,
                stock_profit: stock_worth - stock_cost,
            });
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quotes::{QuoteField, Quotation};

    fn ymd(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, day).unwrap()
    }

    fn price(code: &str, day: u32, last: f64) -> Quotation {
        Quotation {
            asx_code: code.to_string(),
            fetch_date: ymd(day),
            last_price: Some(last),
            ..Default::default()
        }
    }

    fn purchase(code: &str, day: u32, price: f64, amount: f64) -> VirtualPurchase {
        VirtualPurchase {
            id: format!("{code}-{day}"),
            user_id: "u1".to_string(),
            asx_code: code.to_string(),
            buy_date: ymd(day),
            price_at_buy_date: price,
            amount,
            n: (amount / price).floor() as i64,
        }
    }

    #[test]
    fn stock_has_zero_cost_and_worth_until_bought() {
        let quotes = vec![
            price("AAA", 2, 10.0),
            price("BBB", 2, 5.0),
            price("AAA", 3, 11.0),
            price("BBB", 3, 6.0),
        ];
        let prices = PriceMatrix::from_quotations(QuoteField::LastPrice, &quotes);
        let purchases = vec![purchase("AAA", 2, 10.0, 1000.0), purchase("BBB", 3, 6.0, 600.0)];
        let dates: Vec<NaiveDate> = (2..=3).map(ymd).collect();

        let records = portfolio_performance(&purchases, &prices, &dates);
        assert_eq!(records.len(), 4);

        let bbb_day2 = &records[1];
        assert_eq!(bbb_day2.stock, "BBB");
        assert_eq!(bbb_day2.stock_cost, 0.0);
        assert_eq!(bbb_day2.stock_worth, 0.0);
        assert_eq!(bbb_day2.portfolio_cost, 1000.0);
        assert_eq!(bbb_day2.portfolio_worth, 1000.0);

        let aaa_day3 = &records[2];
        assert_eq!(aaa_day3.portfolio_cost, 1600.0);
        assert_eq!(aaa_day3.portfolio_worth, 100.0 * 11.0 + 100.0 * 6.0);
        assert_eq!(aaa_day3.stock_profit, 100.0);
    }

    #[test]
    fn non_trading_buy_date_applies_on_next_trading_day() {
        let quotes = vec![price("AAA", 5, 10.0), price("AAA", 9, 12.0)];
        let prices = PriceMatrix::from_quotations(QuoteField::LastPrice, &quotes);
        let purchases = vec![purchase("AAA", 7, 10.0, 500.0)];
        let dates: Vec<NaiveDate> = (5..=9).map(ymd).collect();

        let records = portfolio_performance(&purchases, &prices, &dates);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stock_cost, 0.0);
        assert_eq!(records[1].stock_cost, 500.0);
        assert_eq!(records[1].stock_worth, 600.0);
    }

    #[test]
    fn missing_price_skips_only_that_record() {
        let quotes = vec![price("AAA", 2, 10.0)];
        let prices = PriceMatrix::from_quotations(QuoteField::LastPrice, &quotes);
        let purchases = vec![purchase("AAA", 2, 10.0, 100.0), purchase("BBB", 2, 1.0, 100.0)];
        let records = portfolio_performance(&purchases, &prices, &[ymd(2)]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].portfolio_cost, 200.0);
        assert_eq!(records[0].portfolio_worth, 100.0);
    }
}
