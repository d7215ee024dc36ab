//! Weekly report output
//!
//! Rolls every ticker's screen record into `stocks.json`: the full list,
//! a landing-page summary and the tickers that failed this run.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::types::Episode;
use crate::signals::StockSignals;

/// Report file name inside the output directory
pub const REPORT_FILE: &str = "stocks.json";

/// How many approaching tickers the landing page lists
const APPROACHING_LIMIT: usize = 10;

/// Serialized form of an episode
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TouchRecord {
    /// "Mar 2020"
    pub date: String,
    pub date_iso: NaiveDate,
    /// Recovery month/year or "ongoing"
    pub recovery: String,
    pub weeks_below: usize,
    pub max_depth: Decimal,
    pub return_1yr: Option<Decimal>,
    pub return_to_now: Option<Decimal>,
    pub ongoing: bool,
}

impl From<&Episode> for TouchRecord {
    fn from(ep: &Episode) -> Self {
        Self {
            date: ep.start_label(),
            date_iso: ep.start_date,
            recovery: ep.recovery_label(),
            weeks_below: ep.weeks_below,
            max_depth: ep.max_depth,
            return_1yr: ep.forward_return_1yr,
            return_to_now: ep.return_to_present,
            ongoing: ep.is_ongoing(),
        }
    }
}

/// Landing page summary
#[derive(Debug, Clone, Serialize)]
pub struct LandingSummary {
    pub total_stocks: usize,
    pub below_line_count: usize,
    pub approaching_count: usize,
    pub oversold_count: usize,
    /// Deepest first
    pub below_line_stocks: Vec<StockSignals>,
    /// Closest to the line first
    pub approaching_stocks: Vec<StockSignals>,
    pub oversold_stocks: Vec<StockSignals>,
}

impl LandingSummary {
    pub fn from_stocks(stocks: &[StockSignals]) -> Self {
        let mut below: Vec<StockSignals> = stocks.iter().filter(|s| s.below_line).cloned().collect();
        below.sort_by(|a, b| a.pct_from_wma.cmp(&b.pct_from_wma));

        let mut approaching: Vec<StockSignals> = stocks
            .iter()
            .filter(|s| !s.below_line && s.zone.is_nearing())
            .cloned()
            .collect();
        approaching.sort_by(|a, b| a.pct_from_wma.cmp(&b.pct_from_wma));
        let approaching_count = approaching.len();
        approaching.truncate(APPROACHING_LIMIT);

        let oversold: Vec<StockSignals> = stocks.iter().filter(|s| s.is_oversold()).cloned().collect();

        Self {
            total_stocks: stocks.len(),
            below_line_count: below.len(),
            approaching_count,
            oversold_count: oversold.len(),
            below_line_stocks: below,
            approaching_stocks: approaching,
            oversold_stocks: oversold,
        }
    }
}

/// Full weekly report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub stocks: Vec<StockSignals>,
    pub summary: LandingSummary,
    /// Tickers that could not be fetched or screened
    pub errors: Vec<String>,
    pub generated: DateTime<Utc>,
    pub generated_readable: String,
}

impl Report {
    pub fn new(stocks: Vec<StockSignals>, errors: Vec<String>, generated: DateTime<Utc>) -> Self {
        let summary = LandingSummary::from_stocks(&stocks);
        Self {
            stocks,
            summary,
            errors,
            generated,
            generated_readable: generated.format("%B %d, %Y").to_string(),
        }
    }

    /// Write `stocks.json` into `dir`, creating it if needed
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;

        let path = dir.join(REPORT_FILE);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}
