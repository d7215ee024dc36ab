//! Below The Line
//!
//! Weekly screen of a stock universe against each ticker's 200-week
//! moving average.
//!
//! # Pipeline
//!
//! - Weekly adjusted closes from the data provider
//! - Trailing 200-week average and percent distance per week
//! - Below-the-line episodes, merged across short bounces
//! - Forward returns per episode, rolled into a JSON report

pub mod core;
pub mod config;
pub mod data;
pub mod universe;
pub mod signals;
pub mod report;

use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Install the global tracing subscriber at the configured level
pub fn init_logging(log_level: &str) -> anyhow::Result<()> {
    let level = log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
