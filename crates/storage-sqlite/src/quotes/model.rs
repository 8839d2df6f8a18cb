use asxtrade_core::quotes::Quotation;
use chrono::NaiveDate;
use diesel::prelude::*;

/// One row of the `quotations` table, keyed by (asx_code, fetch_date).
#[derive(Queryable, Identifiable, Selectable, Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::quotations)]
#[diesel(primary_key(asx_code, fetch_date))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuotationDB {
    pub asx_code: String,
    pub fetch_date: NaiveDate,
    pub last_price: Option<f64>,
    pub open: Option<f64>,
    pub day_high: Option<f64>,
    pub day_low: Option<f64>,
    pub volume: Option<i64>,
    pub change_price: Option<f64>,
    pub change_in_percent: Option<f64>,
    pub pe: Option<f64>,
    pub eps: Option<f64>,
    pub annual_dividend_yield: Option<f64>,
    pub market_cap: Option<f64>,
    pub number_of_shares: Option<i64>,
    pub error_code: Option<String>,
}

impl From<QuotationDB> for Quotation {
    fn from(db: QuotationDB) -> Self {
        Self {
            asx_code: db.asx_code,
            fetch_date: db.fetch_date,
            last_price: db.last_price,
            open: db.open,
            day_high: db.day_high,
            day_low: db.day_low,
            volume: db.volume,
            change_price: db.change_price,
            change_in_percent: db.change_in_percent,
            pe: db.pe,
            eps: db.eps,
            annual_dividend_yield: db.annual_dividend_yield,
            market_cap: db.market_cap,
            number_of_shares: db.number_of_shares,
            error_code: db.error_code,
        }
    }
}

impl From<Quotation> for QuotationDB {
    fn from(quote: Quotation) -> Self {
        // NaN is not a value SQLite can compare; store it as NULL.
        let finite = |v: Option<f64>| v.filter(|x| x.is_finite());
        Self {
            asx_code: quote.asx_code.trim().to_uppercase(),
            fetch_date: quote.fetch_date,
            last_price: finite(quote.last_price),
            open: finite(quote.open),
            day_high: finite(quote.day_high),
            day_low: finite(quote.day_low),
            volume: quote.volume,
            change_price: finite(quote.change_price),
            change_in_percent: finite(quote.change_in_percent),
            pe: finite(quote.pe),
            eps: finite(quote.eps),
            annual_dividend_yield: finite(quote.annual_dividend_yield),
            market_cap: finite(quote.market_cap),
            number_of_shares: quote.number_of_shares,
            error_code: quote.error_code.filter(|c| !c.is_empty()),
        }
    }
}
