//! Technical indicators over a price series.

/// Wilder's relative strength index.
///
/// The result is aligned with `prices`; the first `period` entries are `None`.
pub fn relative_strength_index(prices: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut rsi = vec![None; prices.len()];
    if period == 0 || prices.len() <= period {
        return rsi;
    }
    let changes: Vec<f64> = prices.windows(2).map(|w| w[1] - w[0]).collect();
    let p = period as f64;
    let mut avg_gain = changes[..period].iter().map(|c| c.max(0.0)).sum::<f64>() / p;
    let mut avg_loss = changes[..period].iter().map(|c| (-c).max(0.0)).sum::<f64>() / p;
    rsi[period] = Some(rsi_value(avg_gain, avg_loss));
    for (i, change) in changes.iter().enumerate().skip(period) {
        avg_gain = (avg_gain * (p - 1.0) + change.max(0.0)) / p;
        avg_loss = (avg_loss * (p - 1.0) + (-change).max(0.0)) / p;
        rsi[i + 1] = Some(rsi_value(avg_gain, avg_loss));
    }
    rsi
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            50.0
        } else {
            100.0
        }
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_prices_saturate() {
        let prices: Vec<f64> = (1..=20).map(f64::from).collect();
        let rsi = relative_strength_index(&prices, 14);
        assert!(rsi[..14].iter().all(Option::is_none));
        assert_eq!(rsi[14], Some(100.0));
        assert_eq!(rsi[19], Some(100.0));
    }

    #[test]
    fn stays_within_bounds() {
        let prices = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ];
        let rsi = relative_strength_index(&prices, 14);
        let first = rsi[14].unwrap();
        assert!((first - 70.53).abs() < 0.1, "got {first}");
        assert!(rsi.iter().flatten().all(|v| (0.0..=100.0).contains(v)));
    }

    #[test]
    fn short_series_has_no_values() {
        assert!(relative_strength_index(&[1.0, 2.0], 14)
            .iter()
            .all(Option::is_none));
    }
}
