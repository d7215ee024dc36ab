//! Core type definitions for the screener
//!
//! These types carry one ticker's weekly history from the data provider
//! through the episode detector and into the report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One weekly quote as delivered by a data provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyQuote {
    /// Week-ending date
    pub date: NaiveDate,
    /// Raw close
    pub close: Decimal,
    /// Split/dividend adjusted close (used for every calculation)
    pub adjusted_close: Decimal,
    /// Volume traded during the week
    pub volume: u64,
}

impl WeeklyQuote {
    /// Create a quote where close and adjusted close are the same
    pub fn new(date: NaiveDate, close: Decimal) -> Self {
        Self {
            date,
            close,
            adjusted_close: close,
            volume: 0,
        }
    }
}

/// A week of price history paired with its trailing moving average
///
/// `trailing_average` is `None` during the warm-up window, before the
/// moving average has enough history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyBar {
    pub date: NaiveDate,
    pub price: Decimal,
    pub trailing_average: Option<Decimal>,
}

impl WeeklyBar {
    /// Create a bar
    pub fn new(date: NaiveDate, price: Decimal, trailing_average: Option<Decimal>) -> Self {
        Self { date, price, trailing_average }
    }

    /// Percent distance of price from the trailing average
    ///
    /// Negative while below the line. `None` during warm-up or when the
    /// average is zero.
    pub fn pct_distance(&self) -> Option<Decimal> {
        let avg = self.trailing_average?;
        if avg.is_zero() {
            return None;
        }
        Some((self.price - avg) / avg * Decimal::ONE_HUNDRED)
    }

    /// Price closed strictly below the trailing average
    pub fn is_below(&self) -> bool {
        match self.trailing_average {
            Some(avg) => self.price < avg,
            None => false,
        }
    }
}

/// One below-the-line run
///
/// Indices are positions in the complete series the episode was detected
/// on. `end_index` is the first week of the sustained recovery, so the
/// episode covers `[start_index, end_index)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub start_index: usize,
    pub start_date: NaiveDate,
    pub end_index: Option<usize>,
    pub end_date: Option<NaiveDate>,
    pub weeks_below: usize,
    /// Deepest distance below the average, as a positive percentage (1 dp)
    pub max_depth: Decimal,
    /// Percent change from the start week to 52 weeks later (1 dp)
    pub forward_return_1yr: Option<Decimal>,
    /// Percent change from the start week to the latest bar (1 dp)
    pub return_to_present: Option<Decimal>,
}

impl Episode {
    /// No sustained recovery was found before the series ended
    pub fn is_ongoing(&self) -> bool {
        self.end_index.is_none()
    }

    /// Short month/year label of the start week, e.g. "Mar 2020"
    pub fn start_label(&self) -> String {
        month_label(self.start_date)
    }

    /// Month/year label of the recovery week, or "ongoing"
    pub fn recovery_label(&self) -> String {
        match self.end_date {
            Some(date) => month_label(date),
            None => "ongoing".to_string(),
        }
    }
}

/// Format a date as "Mar 2020"
pub fn month_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// Where the latest close sits relative to the line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Zone {
    /// 10% or more below the line
    ExtremeValue,
    /// 5-10% below
    DeepValue,
    /// At or below the line
    BelowLine,
    /// Within 5% above
    AtDoorstep,
    /// 5-10% above
    GettingClose,
    /// 10-15% above
    Approaching,
    Above,
}

impl Zone {
    /// Classify a percent distance from the average
    pub fn from_pct(pct: Decimal) -> Self {
        if pct <= Decimal::from(-10) {
            Zone::ExtremeValue
        } else if pct <= Decimal::from(-5) {
            Zone::DeepValue
        } else if pct <= Decimal::ZERO {
            Zone::BelowLine
        } else if pct <= Decimal::from(5) {
            Zone::AtDoorstep
        } else if pct <= Decimal::from(10) {
            Zone::GettingClose
        } else if pct <= Decimal::from(15) {
            Zone::Approaching
        } else {
            Zone::Above
        }
    }

    /// Close to the line from above
    pub fn is_nearing(&self) -> bool {
        matches!(self, Zone::AtDoorstep | Zone::GettingClose | Zone::Approaching)
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::ExtremeValue => write!(f, "extreme_value"),
            Zone::DeepValue => write!(f, "deep_value"),
            Zone::BelowLine => write!(f, "below_line"),
            Zone::AtDoorstep => write!(f, "at_doorstep"),
            Zone::GettingClose => write!(f, "getting_close"),
            Zone::Approaching => write!(f, "approaching"),
            Zone::Above => write!(f, "above"),
        }
    }
}
