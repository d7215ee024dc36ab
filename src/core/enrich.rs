//! Episode return annotations
//!
//! Adds forward and to-date returns to detected episodes. Both are
//! best-effort: a missing forward window or a date that cannot be found
//! leaves the field empty.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::core::episodes::validate_dates;
use crate::core::error::SeriesError;
use crate::core::types::{Episode, WeeklyBar};

/// Weeks in the forward-return horizon
pub const FORWARD_WEEKS: usize = 52;

/// Annotate episodes with 1-year forward return and return to present
///
/// `series` must be the complete series the episodes were detected on.
pub fn enrich(series: &[WeeklyBar], episodes: Vec<Episode>) -> Result<Vec<Episode>, SeriesError> {
    enrich_with_horizon(series, episodes, FORWARD_WEEKS)
}

/// Same as `enrich` with a custom forward horizon in weeks
pub fn enrich_with_horizon(
    series: &[WeeklyBar],
    episodes: Vec<Episode>,
    forward_weeks: usize,
) -> Result<Vec<Episode>, SeriesError> {
    validate_dates(series)?;

    Ok(episodes
        .into_iter()
        .map(|ep| Episode {
            forward_return_1yr: forward_return(series, ep.start_index, forward_weeks),
            return_to_present: return_to_present(series, ep.start_date),
            ..ep
        })
        .collect())
}

/// Percent change from `start_index` to `start_index + weeks`
///
/// `None` when the later week is past the end of the series.
pub fn forward_return(series: &[WeeklyBar], start_index: usize, weeks: usize) -> Option<Decimal> {
    let entry = series.get(start_index)?;
    let exit = series.get(start_index.checked_add(weeks)?)?;
    pct_change(entry.price, exit.price)
}

/// Percent change from the first bar on or after `start_date` to the last bar
pub fn return_to_present(series: &[WeeklyBar], start_date: NaiveDate) -> Option<Decimal> {
    let idx = series.partition_point(|b| b.date < start_date);
    let entry = series.get(idx)?;
    let latest = series.last()?;
    pct_change(entry.price, latest.price)
}

fn pct_change(from: Decimal, to: Decimal) -> Option<Decimal> {
    if from.is_zero() {
        return None;
    }
    Some(((to - from) / from * Decimal::ONE_HUNDRED).round_dp(1))
}
