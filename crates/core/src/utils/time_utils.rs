use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;

/// Timezone of the exchange; trading days are dates in this zone.
pub const EXCHANGE_TZ: Tz = chrono_tz::Australia::Sydney;

/// Converts a UTC instant to a trading date in the given timezone.
pub fn trading_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date on the exchange.
pub fn exchange_today() -> NaiveDate {
    trading_date_from_utc(Utc::now(), EXCHANGE_TZ)
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        if let Some(next) = current.succ_opt() {
            current = next;
        } else {
            break;
        }
    }
    days
}

/// Every calendar day from `n_days` before `today` up to and including `today`.
///
/// Only days with stored quotations will produce data; the rest are
/// silently absent from any price table built over this window.
pub fn desired_dates(today: NaiveDate, n_days: i64) -> Vec<NaiveDate> {
    get_days_between(today - Duration::days(n_days.max(0)), today)
}

/// Every calendar day from `start` up to and including `today`.
pub fn desired_dates_since(start: NaiveDate, today: NaiveDate) -> Vec<NaiveDate> {
    get_days_between(start, today)
}

/// Dates are stored and exchanged as `YYYY-MM-DD`.
pub fn format_ymd(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn parse_ymd(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn desired_dates_is_inclusive_of_both_ends() {
        let days = desired_dates(ymd(2024, 3, 10), 3);
        assert_eq!(
            days,
            vec![ymd(2024, 3, 7), ymd(2024, 3, 8), ymd(2024, 3, 9), ymd(2024, 3, 10)]
        );
    }

    #[test]
    fn desired_dates_since_future_start_is_empty() {
        assert!(desired_dates_since(ymd(2024, 3, 11), ymd(2024, 3, 10)).is_empty());
    }

    #[test]
    fn ymd_round_trip() {
        let d = parse_ymd("2021-02-28").unwrap();
        assert_eq!(format_ymd(d), "2021-02-28");
        assert!(parse_ymd("28/02/2021").is_err());
    }
}
