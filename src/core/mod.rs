//! Core analysis
//!
//! - Moving-average feed over the adjusted weekly close
//! - Below-the-line episode detection with recovery hysteresis
//! - Forward and to-date returns per episode
//!
//! Everything here is pure computation over an in-memory series.

pub mod types;
pub mod error;
pub mod indicators;
pub mod episodes;
pub mod enrich;

// Re-export commonly used types
pub use types::{Episode, WeeklyBar, WeeklyQuote, Zone};
pub use error::SeriesError;
pub use episodes::{detect_episodes, DEFAULT_RECOVERY_WEEKS};
pub use enrich::{enrich, enrich_with_horizon, FORWARD_WEEKS};
pub use indicators::{build_weekly_bars, complete_series, rolling_mean};
