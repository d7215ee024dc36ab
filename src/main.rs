//! Below The Line - Weekly Data Update
//!
//! Fetches weekly prices for every ticker in the universe, screens each one
//! against its 200-week moving average and writes `stocks.json`.
//!
//! Run weekly on Saturday to capture Friday close data.
//!
//! Usage:
//!   belowline [config.toml]

use anyhow::{Context, Result};
use chrono::Utc;
use std::env;
use std::time::Duration;
use tracing::{error, info, warn};

use belowline::config::Config;
use belowline::data::AlphaVantageClient;
use belowline::report::Report;
use belowline::signals::analyze;
use belowline::universe::{CompanyDirectory, Universe};

const SEP: &str = "============================================================";
const DEFAULT_CONFIG: &str = "belowline.toml";

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = env::args().nth(1).unwrap_or_else(|| DEFAULT_CONFIG.to_string());
    let cfg = if std::path::Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        eprintln!("{} not found, using defaults", config_path);
        Config::default()
    };

    belowline::init_logging(&cfg.system.log_level)?;

    info!("{}", SEP);
    info!("{} - Weekly Data Update", cfg.system.name);
    info!("Started: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", SEP);

    let Some(api_key) = cfg.provider.resolve_api_key() else {
        error!("No API key: set provider.api_key or {}", belowline::config::API_KEY_ENV);
        return Ok(());
    };

    let companies = CompanyDirectory::load(&cfg.output.companies_path())?;
    info!("Loaded metadata for {} companies", companies.len());

    let universe = match &cfg.output.universe_file {
        Some(path) => Universe::from_file(path)?,
        None => Universe::new(),
    };
    let symbols = universe.symbols();

    let client = AlphaVantageClient::new(api_key, &cfg.provider)?;
    let delay = Duration::from_secs(cfg.provider.rate_limit_delay_secs);

    let mut results = Vec::new();
    let mut errors = Vec::new();

    info!("Processing {} stocks...", symbols.len());

    for (i, symbol) in symbols.iter().enumerate() {
        info!("Processing {}...", symbol);

        match client.fetch_weekly(symbol).await {
            Ok(quotes) => match analyze(symbol, &quotes, &cfg.analysis) {
                Ok(Some(signals)) => results.push(signals.with_company(companies.get(symbol))),
                Ok(None) => errors.push(symbol.clone()),
                Err(e) => {
                    warn!("{}: analysis failed: {:#}", symbol, e);
                    errors.push(symbol.clone());
                }
            },
            Err(e) => {
                warn!("{}: {:#}", symbol, e);
                errors.push(symbol.clone());
            }
        }

        // Rate limiting - wait between calls
        if i + 1 < symbols.len() {
            tokio::time::sleep(delay).await;
        }
    }

    info!("{}", SEP);
    info!("Successfully processed: {}/{}", results.len(), symbols.len());
    if !errors.is_empty() {
        warn!("Errors: {}", errors.join(", "));
    }

    let report = Report::new(results, errors, Utc::now());
    let path = report
        .write(&cfg.output.dir)
        .context("writing weekly report")?;

    info!("Output written to: {}", path.display());
    info!(
        "Below line: {} | Approaching: {} | Oversold: {}",
        report.summary.below_line_count,
        report.summary.approaching_count,
        report.summary.oversold_count
    );
    info!("Completed: {}", Utc::now().format("%Y-%m-%d %H:%M:%S"));
    info!("{}", SEP);

    Ok(())
}
