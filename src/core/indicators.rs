//! Moving-average feed and auxiliary indicators
//!
//! Standard rolling-window formulas over the adjusted weekly close. Values
//! are `None` wherever a window does not have enough history yet.

use rust_decimal::Decimal;

use crate::core::types::{WeeklyBar, WeeklyQuote};

/// Trailing arithmetic mean over up to `window` values
///
/// A value is produced once at least `min_periods` values are available,
/// so the first `min_periods - 1` entries are `None`.
pub fn rolling_mean(values: &[Decimal], window: usize, min_periods: usize) -> Vec<Option<Decimal>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut out = Vec::with_capacity(values.len());
    let mut sum = Decimal::ZERO;

    for (i, value) in values.iter().enumerate() {
        sum += *value;
        if i >= window {
            sum -= values[i - window];
        }

        let count = (i + 1).min(window);
        if count >= min_periods.max(1) {
            out.push(Some(sum / Decimal::from(count)));
        } else {
            out.push(None);
        }
    }

    out
}

/// Pair each quote's adjusted close with its trailing average
pub fn build_weekly_bars(quotes: &[WeeklyQuote], window: usize, min_periods: usize) -> Vec<WeeklyBar> {
    let prices: Vec<Decimal> = quotes.iter().map(|q| q.adjusted_close).collect();
    let averages = rolling_mean(&prices, window, min_periods);

    quotes
        .iter()
        .zip(averages)
        .map(|(q, avg)| WeeklyBar::new(q.date, q.adjusted_close, avg))
        .collect()
}

/// Bars with a defined trailing average
pub fn complete_series(bars: &[WeeklyBar]) -> Vec<WeeklyBar> {
    bars.iter()
        .filter(|b| b.trailing_average.is_some())
        .cloned()
        .collect()
}

/// Change in percent distance over the last week
///
/// Negative means price is moving toward the line.
pub fn week_over_week(series: &[WeeklyBar]) -> Option<Decimal> {
    let n = series.len();
    if n < 2 {
        return None;
    }
    let latest = series[n - 1].pct_distance()?;
    let previous = series[n - 2].pct_distance()?;
    Some(latest - previous)
}

/// Relative strength index using simple means of gains and losses
///
/// Needs `periods` price changes, so the first defined value is at index
/// `periods`. A window with no losses reads 100.
pub fn rsi(values: &[Decimal], periods: usize) -> Vec<Option<Decimal>> {
    let mut out = vec![None; values.len()];
    if periods == 0 || values.len() <= periods {
        return out;
    }

    let deltas: Vec<Decimal> = values.windows(2).map(|w| w[1] - w[0]).collect();
    let n = Decimal::from(periods);

    for end in periods..=deltas.len() {
        let window = &deltas[end - periods..end];
        let gain: Decimal = window.iter().filter(|d| **d > Decimal::ZERO).sum();
        let loss: Decimal = window.iter().filter(|d| **d < Decimal::ZERO).map(|d| d.abs()).sum();
        let avg_gain = gain / n;
        let avg_loss = loss / n;

        let value = if avg_loss.is_zero() {
            if avg_gain.is_zero() {
                Decimal::from(50)
            } else {
                Decimal::ONE_HUNDRED
            }
        } else {
            let rs = avg_gain / avg_loss;
            Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs)
        };

        out[end] = Some(value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn prices(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|v| Decimal::from(*v)).collect()
    }

    #[test]
    fn test_rolling_mean_min_periods() {
        let values = prices(&[1, 2, 3, 4, 5]);
        let avg = rolling_mean(&values, 3, 2);

        assert_eq!(avg[0], None);
        assert_eq!(avg[1], Some(dec!(1.5)));
        assert_eq!(avg[2], Some(dec!(2)));
        // window slides: (2 + 3 + 4) / 3
        assert_eq!(avg[3], Some(dec!(3)));
        assert_eq!(avg[4], Some(dec!(4)));
    }

    #[test]
    fn test_rolling_mean_full_window_only() {
        let values = prices(&[10, 20, 30]);
        let avg = rolling_mean(&values, 3, 3);
        assert_eq!(avg, vec![None, None, Some(dec!(20))]);
    }

    #[test]
    fn test_build_and_complete_series() {
        let start = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let quotes: Vec<WeeklyQuote> = (0..6)
            .map(|i| WeeklyQuote::new(start + chrono::Duration::weeks(i), Decimal::from(100 + i)))
            .collect();

        let bars = build_weekly_bars(&quotes, 4, 3);
        assert_eq!(bars.len(), 6);
        assert!(bars[1].trailing_average.is_none());
        assert_eq!(bars[2].trailing_average, Some(dec!(101)));

        let complete = complete_series(&bars);
        assert_eq!(complete.len(), 4);
        assert_eq!(complete[0].date, bars[2].date);
    }

    #[test]
    fn test_week_over_week() {
        let d = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        let series = vec![
            WeeklyBar::new(d, dec!(110), Some(dec!(100))),
            WeeklyBar::new(d + chrono::Duration::weeks(1), dec!(104), Some(dec!(100))),
        ];
        assert_eq!(week_over_week(&series), Some(dec!(-6)));
        assert_eq!(week_over_week(&series[..1]), None);
    }

    #[test]
    fn test_rsi_all_gains() {
        let values = prices(&[1, 2, 3, 4, 5]);
        let out = rsi(&values, 3);
        assert_eq!(out[2], None);
        assert_eq!(out[3], Some(dec!(100)));
        assert_eq!(out[4], Some(dec!(100)));
    }

    #[test]
    fn test_rsi_balanced() {
        // +2, -2, +2, -2: equal average gain and loss
        let values = prices(&[10, 12, 10, 12, 10]);
        let out = rsi(&values, 4);
        assert_eq!(out[4], Some(dec!(50)));
    }

    #[test]
    fn test_rsi_short_series() {
        let values = prices(&[1, 2]);
        assert_eq!(rsi(&values, 14), vec![None, None]);
    }
}
