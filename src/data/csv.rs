//! CSV price history for offline runs
//!
//! Expected format: `date,close,adjusted_close[,volume]` with ISO dates.
//! First line is header (skipped).

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

use crate::core::types::WeeklyQuote;

/// Load weekly quotes from a CSV file, sorted by date
pub fn load_csv(path: &Path) -> Result<Vec<WeeklyQuote>> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    read_csv(file).with_context(|| format!("reading {}", path.display()))
}

/// Parse weekly quotes from any reader
pub fn read_csv<R: Read>(source: R) -> Result<Vec<WeeklyQuote>> {
    let reader = BufReader::new(source);
    let mut quotes = Vec::new();

    for (i, line) in reader.lines().enumerate() {
        if i == 0 {
            continue; // Skip header
        }

        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 3 {
            bail!("line {}: expected at least 3 columns, got {}", i + 1, parts.len());
        }

        let date = NaiveDate::parse_from_str(parts[0], "%Y-%m-%d")
            .with_context(|| format!("line {}: bad date {:?}", i + 1, parts[0]))?;
        let close = Decimal::from_str(parts[1])
            .with_context(|| format!("line {}: bad close {:?}", i + 1, parts[1]))?;
        let adjusted_close = Decimal::from_str(parts[2])
            .with_context(|| format!("line {}: bad adjusted close {:?}", i + 1, parts[2]))?;
        let volume = match parts.get(3) {
            Some(v) if !v.is_empty() => v
                .parse::<u64>()
                .with_context(|| format!("line {}: bad volume {:?}", i + 1, v))?,
            _ => 0,
        };

        quotes.push(WeeklyQuote {
            date,
            close,
            adjusted_close,
            volume,
        });
    }

    quotes.sort_by_key(|q| q.date);
    Ok(quotes)
}
