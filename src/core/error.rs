//! Series validation errors

use chrono::NaiveDate;
use thiserror::Error;

/// Precondition failures for the episode detector and enrichment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("Empty weekly series")]
    Empty,

    #[error("Invalid recovery threshold: {threshold} (must be at least 1 week)")]
    InvalidRecoveryThreshold { threshold: usize },

    #[error("Bar at index {index} has no trailing average (series must be complete)")]
    MissingAverage { index: usize },

    #[error("Dates not strictly increasing at index {index}: previous={previous}, current={current}")]
    UnorderedDates {
        index: usize,
        previous: NaiveDate,
        current: NaiveDate,
    },
}
