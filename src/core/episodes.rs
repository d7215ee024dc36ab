//! Below-the-Line Episode Detection
//!
//! Segments a complete weekly series into episodes where price closed
//! below its trailing moving average.
//!
//! # Algorithm
//!
//! - A week closing below the average opens an episode
//! - Weeks back above the average are counted while the episode is open
//! - A week below again resets the count (a bounce, the episode continues)
//! - `recovery_threshold` consecutive weeks above closes the episode
//! - The episode ends where that recovery streak began, so brief bounces
//!   stay inside the episode and the sustained recovery stays outside
//! - The scan resumes at the recovery week itself
//!
//! An episode still open when the series runs out is ongoing.

use rust_decimal::Decimal;

use crate::core::error::SeriesError;
use crate::core::types::{Episode, WeeklyBar};

/// Consecutive weeks above the line that confirm a recovery
pub const DEFAULT_RECOVERY_WEEKS: usize = 2;

/// Detect below-the-line episodes
///
/// `series` must contain only bars with a trailing average, in strictly
/// increasing date order. Episodes come back ordered by `start_index`,
/// non-overlapping, with return fields left empty (see `enrich`).
pub fn detect_episodes(
    series: &[WeeklyBar],
    recovery_threshold: usize,
) -> Result<Vec<Episode>, SeriesError> {
    if recovery_threshold < 1 {
        return Err(SeriesError::InvalidRecoveryThreshold {
            threshold: recovery_threshold,
        });
    }
    validate_complete(series)?;

    let n = series.len();
    let mut episodes = Vec::new();
    let mut i = 0;

    while i < n {
        if !series[i].is_below() {
            i += 1;
            continue;
        }

        let start = i;
        let end = find_recovery(series, start, recovery_threshold);
        episodes.push(build_episode(series, start, end));

        match end {
            // Recovery week is re-examined as a fresh candidate
            Some(end) => i = end,
            None => break,
        }
    }

    Ok(episodes)
}

/// Index where the first sustained recovery after `start` began
fn find_recovery(series: &[WeeklyBar], start: usize, recovery_threshold: usize) -> Option<usize> {
    let mut consecutive_above = 0;

    for (j, bar) in series.iter().enumerate().skip(start + 1) {
        if bar.is_below() {
            consecutive_above = 0;
            continue;
        }

        consecutive_above += 1;
        if consecutive_above >= recovery_threshold {
            return Some(j + 1 - consecutive_above);
        }
    }

    None
}

fn build_episode(series: &[WeeklyBar], start: usize, end: Option<usize>) -> Episode {
    let stop = end.unwrap_or(series.len());
    let window = &series[start..stop];

    let min_pct = window
        .iter()
        .filter_map(WeeklyBar::pct_distance)
        .min()
        .unwrap_or(Decimal::ZERO);

    Episode {
        start_index: start,
        start_date: series[start].date,
        end_index: end,
        end_date: end.map(|e| series[e].date),
        weeks_below: stop - start,
        max_depth: min_pct.abs().round_dp(1),
        forward_return_1yr: None,
        return_to_present: None,
    }
}

/// Check the series is non-empty, complete and strictly date ordered
pub fn validate_complete(series: &[WeeklyBar]) -> Result<(), SeriesError> {
    validate_dates(series)?;

    if let Some(index) = series.iter().position(|b| b.trailing_average.is_none()) {
        return Err(SeriesError::MissingAverage { index });
    }

    Ok(())
}

/// Check the series is non-empty and strictly date ordered
pub fn validate_dates(series: &[WeeklyBar]) -> Result<(), SeriesError> {
    if series.is_empty() {
        return Err(SeriesError::Empty);
    }

    for (index, pair) in series.windows(2).enumerate() {
        if pair[1].date <= pair[0].date {
            return Err(SeriesError::UnorderedDates {
                index: index + 1,
                previous: pair[0].date,
                current: pair[1].date,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal_macros::dec;

    /// Build a series from a pattern of 'B' (below) and 'A' (above) weeks
    fn pattern(flags: &str) -> Vec<WeeklyBar> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 3).unwrap();
        flags
            .chars()
            .enumerate()
            .map(|(i, c)| {
                let price = if c == 'B' { dec!(90) } else { dec!(110) };
                WeeklyBar::new(start + Duration::weeks(i as i64), price, Some(dec!(100)))
            })
            .collect()
    }

    #[test]
    fn test_bounce_is_bridged() {
        let episodes = detect_episodes(&pattern("BABAA"), 2).unwrap();

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].start_index, 0);
        assert_eq!(episodes[0].end_index, Some(3));
        assert_eq!(episodes[0].weeks_below, 3);
        assert!(!episodes[0].is_ongoing());
    }

    #[test]
    fn test_sustained_recovery_splits() {
        let series = pattern("BAABAA");
        let episodes = detect_episodes(&series, 2).unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].start_index, 0);
        assert_eq!(episodes[0].end_index, Some(1));
        assert_eq!(episodes[0].weeks_below, 1);
        assert_eq!(episodes[0].end_date, Some(series[1].date));
        assert_eq!(episodes[1].start_index, 3);
        assert_eq!(episodes[1].end_index, Some(4));
    }

    #[test]
    fn test_ongoing_tail() {
        let episodes = detect_episodes(&pattern("BBB"), 2).unwrap();

        assert_eq!(episodes.len(), 1);
        assert!(episodes[0].is_ongoing());
        assert_eq!(episodes[0].weeks_below, 3);
        assert_eq!(episodes[0].end_index, None);
        assert_eq!(episodes[0].end_date, None);
    }

    #[test]
    fn test_single_week_dip() {
        let episodes = detect_episodes(&pattern("AABAAA"), 2).unwrap();

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].start_index, 2);
        assert_eq!(episodes[0].end_index, Some(3));
        assert_eq!(episodes[0].weeks_below, 1);
    }

    #[test]
    fn test_reopen_near_end_stays_separate() {
        // Closed episode, then a new one that never confirms recovery
        let episodes = detect_episodes(&pattern("BAABA"), 2).unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].end_index, Some(1));
        assert_eq!(episodes[1].start_index, 3);
        assert!(episodes[1].is_ongoing());
        assert_eq!(episodes[1].weeks_below, 2);
    }

    #[test]
    fn test_threshold_one_splits_every_bounce() {
        let episodes = detect_episodes(&pattern("BAB"), 1).unwrap();

        assert_eq!(episodes.len(), 2);
        assert_eq!(episodes[0].end_index, Some(1));
        assert_eq!(episodes[1].start_index, 2);
        assert!(episodes[1].is_ongoing());
    }

    #[test]
    fn test_longer_threshold_merges_two_week_bounce() {
        let episodes = detect_episodes(&pattern("BAABAAA"), 3).unwrap();

        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].end_index, Some(4));
        assert_eq!(episodes[0].weeks_below, 4);
    }

    #[test]
    fn test_no_episodes_when_always_above() {
        let episodes = detect_episodes(&pattern("AAAA"), 2).unwrap();
        assert!(episodes.is_empty());
    }

    #[test]
    fn test_price_equal_to_average_is_above() {
        let mut series = pattern("BAAA");
        series[1].price = dec!(100);
        series[2].price = dec!(100);

        let episodes = detect_episodes(&series, 2).unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].end_index, Some(1));
    }

    #[test]
    fn test_max_depth_magnitude_rounded() {
        let mut series = pattern("BBAA");
        series[1].price = dec!(87.655); // -12.345%

        let episodes = detect_episodes(&series, 2).unwrap();
        assert_eq!(episodes[0].max_depth, dec!(12.3));
    }

    #[test]
    fn test_max_depth_excludes_recovery_weeks() {
        let mut series = pattern("BAAB");
        series[0].price = dec!(95);
        series[3].price = dec!(60);

        let episodes = detect_episodes(&series, 2).unwrap();
        assert_eq!(episodes[0].max_depth, dec!(5.0));
        assert_eq!(episodes[1].max_depth, dec!(40.0));
    }

    #[test]
    fn test_idempotent() {
        let series = pattern("BABAABBBAABAB");
        let first = detect_episodes(&series, 2).unwrap();
        let second = detect_episodes(&series, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_rejects_empty_series() {
        assert_eq!(detect_episodes(&[], 2), Err(SeriesError::Empty));
    }

    #[test]
    fn test_rejects_zero_threshold() {
        assert_eq!(
            detect_episodes(&pattern("BA"), 0),
            Err(SeriesError::InvalidRecoveryThreshold { threshold: 0 })
        );
    }

    #[test]
    fn test_rejects_missing_average() {
        let mut series = pattern("BAB");
        series[2].trailing_average = None;
        assert_eq!(
            detect_episodes(&series, 2),
            Err(SeriesError::MissingAverage { index: 2 })
        );
    }

    #[test]
    fn test_rejects_unordered_dates() {
        let mut series = pattern("BAB");
        series[2].date = series[1].date;
        assert!(matches!(
            detect_episodes(&series, 2),
            Err(SeriesError::UnorderedDates { index: 2, .. })
        ));
    }
}
