//! Per-ticker screen record
//!
//! Runs one ticker's weekly quotes through the moving-average feed, the
//! episode detector and enrichment, and condenses the latest week into the
//! fields the report shows.

use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use tracing::{info, warn};

use crate::config::AnalysisConfig;
use crate::core::enrich::enrich_with_horizon;
use crate::core::episodes::detect_episodes;
use crate::core::indicators::{build_weekly_bars, complete_series, rsi, week_over_week};
use crate::core::types::{Episode, WeeklyQuote, Zone};
use crate::report::TouchRecord;
use crate::universe::CompanyInfo;

/// Screen record for one ticker
#[derive(Debug, Clone, Serialize)]
pub struct StockSignals {
    pub symbol: String,
    pub name: String,
    pub sector: String,
    pub ir_url: String,
    pub close: Decimal,
    pub wma_200: Decimal,
    pub buy_threshold: Decimal,
    pub pct_from_wma: Decimal,
    pub wow_change: Option<Decimal>,
    pub rsi_14: Option<Decimal>,
    pub below_line: bool,
    pub approaching: bool,
    pub zone: Zone,
    #[serde(rename = "historical_touches", serialize_with = "serialize_touches")]
    pub episodes: Vec<Episode>,
    pub touch_count: usize,
    pub avg_return_after_touch: Option<Decimal>,
    pub avg_weeks_below: Option<Decimal>,
    pub last_updated: NaiveDate,
    pub data_weeks: usize,
}

fn serialize_touches<S: Serializer>(episodes: &[Episode], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(episodes.iter().map(TouchRecord::from))
}

impl StockSignals {
    /// Merge company name, sector and investor-relations URL
    pub fn with_company(mut self, info: Option<&CompanyInfo>) -> Self {
        match info {
            Some(info) => {
                self.name = info.name.clone().unwrap_or_else(|| self.symbol.clone());
                self.sector = info.sector.clone().unwrap_or_default();
                self.ir_url = info.ir_url.clone().unwrap_or_default();
            }
            None => {
                self.name = self.symbol.clone();
                self.sector.clear();
                self.ir_url.clear();
            }
        }
        self
    }

    /// 14-week RSI under 30
    pub fn is_oversold(&self) -> bool {
        self.rsi_14.map_or(false, |r| r < Decimal::from(30))
    }
}

/// Build the screen record for one ticker
///
/// `quotes` must be in ascending date order. Returns `Ok(None)` when the
/// ticker does not have enough history to screen.
pub fn analyze(symbol: &str, quotes: &[WeeklyQuote], cfg: &AnalysisConfig) -> Result<Option<StockSignals>> {
    if quotes.len() < cfg.min_history_weeks {
        warn!(
            "{}: only {} weeks of data (need {}+)",
            symbol,
            quotes.len(),
            cfg.min_history_weeks
        );
        return Ok(None);
    }

    let bars = build_weekly_bars(quotes, cfg.ma_window, cfg.ma_min_periods);
    let prices: Vec<Decimal> = quotes.iter().map(|q| q.adjusted_close).collect();
    let rsi_latest = rsi(&prices, cfg.rsi_periods).last().copied().flatten();

    let complete = complete_series(&bars);
    let Some(latest) = complete.last() else {
        warn!("{}: no weeks with a {}-week average", symbol, cfg.ma_window);
        return Ok(None);
    };
    let (Some(wma), Some(pct)) = (latest.trailing_average, latest.pct_distance()) else {
        warn!("{}: latest average is unusable", symbol);
        return Ok(None);
    };

    let episodes = detect_episodes(&complete, cfg.recovery_weeks)?;
    let episodes = enrich_with_horizon(&complete, episodes, cfg.forward_weeks)?;

    let wow_change = week_over_week(&complete);
    let zone = Zone::from_pct(pct);

    let returns: Vec<Decimal> = episodes.iter().filter_map(|e| e.forward_return_1yr).collect();
    let avg_return_after_touch = mean(&returns);
    let weeks: Vec<Decimal> = episodes.iter().map(|e| Decimal::from(e.weeks_below)).collect();
    let avg_weeks_below = mean(&weeks);

    info!(
        "{}: {:.1}% from WMA, RSI: {}, Zone: {}, touches: {}",
        symbol,
        pct,
        rsi_latest.map_or_else(|| "n/a".to_string(), |r| format!("{:.0}", r)),
        zone,
        episodes.len()
    );

    Ok(Some(StockSignals {
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        sector: String::new(),
        ir_url: String::new(),
        close: latest.price.round_dp(2),
        wma_200: wma.round_dp(2),
        buy_threshold: wma.round_dp(2),
        pct_from_wma: pct.round_dp(2),
        wow_change: wow_change.map(|w| w.round_dp(2)),
        rsi_14: rsi_latest.map(|r| r.round_dp(1)),
        below_line: latest.is_below(),
        approaching: wow_change.map_or(false, |w| w < Decimal::ZERO),
        zone,
        touch_count: episodes.len(),
        episodes,
        avg_return_after_touch,
        avg_weeks_below,
        last_updated: latest.date,
        data_weeks: complete.len(),
    }))
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some((sum / Decimal::from(values.len())).round_dp(1))
}
