//! Configuration loader
//!
//! Infrastructure settings plus the handful of analysis constants the
//! screen is built on (200-week window, 2-week recovery).

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

use crate::core::enrich::FORWARD_WEEKS;
use crate::core::episodes::DEFAULT_RECOVERY_WEEKS;

/// Environment variable consulted when `provider.api_key` is empty
pub const API_KEY_ENV: &str = "ALPHA_VANTAGE_KEY";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_name() -> String {
    "Below The Line".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Pause between provider calls (free tier allows 5 calls/min)
    #[serde(default = "default_rate_limit_delay_secs")]
    pub rate_limit_delay_secs: u64,
}

fn default_base_url() -> String {
    "https://www.alphavantage.co/query".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_rate_limit_delay_secs() -> u64 {
    12
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            rate_limit_delay_secs: default_rate_limit_delay_secs(),
        }
    }
}

impl ProviderConfig {
    /// API key from the config file, falling back to the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        if !self.api_key.trim().is_empty() {
            return Some(self.api_key.trim().to_string());
        }
        std::env::var(API_KEY_ENV)
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalysisConfig {
    #[serde(default = "default_ma_window")]
    pub ma_window: usize,
    #[serde(default = "default_ma_min_periods")]
    pub ma_min_periods: usize,
    #[serde(default = "default_recovery_weeks")]
    pub recovery_weeks: usize,
    #[serde(default = "default_rsi_periods")]
    pub rsi_periods: usize,
    #[serde(default = "default_min_history_weeks")]
    pub min_history_weeks: usize,
    #[serde(default = "default_forward_weeks")]
    pub forward_weeks: usize,
}

fn default_ma_window() -> usize {
    200
}

fn default_ma_min_periods() -> usize {
    50
}

fn default_recovery_weeks() -> usize {
    DEFAULT_RECOVERY_WEEKS
}

fn default_rsi_periods() -> usize {
    14
}

fn default_min_history_weeks() -> usize {
    200
}

fn default_forward_weeks() -> usize {
    FORWARD_WEEKS
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            ma_window: default_ma_window(),
            ma_min_periods: default_ma_min_periods(),
            recovery_weeks: default_recovery_weeks(),
            rsi_periods: default_rsi_periods(),
            min_history_weeks: default_min_history_weeks(),
            forward_weeks: default_forward_weeks(),
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.ma_window == 0 {
            bail!("analysis.ma_window must be at least 1");
        }
        if self.ma_min_periods == 0 || self.ma_min_periods > self.ma_window {
            bail!(
                "analysis.ma_min_periods must be between 1 and ma_window ({}), got {}",
                self.ma_window,
                self.ma_min_periods
            );
        }
        if self.recovery_weeks == 0 {
            bail!("analysis.recovery_weeks must be at least 1");
        }
        if self.rsi_periods == 0 {
            bail!("analysis.rsi_periods must be at least 1");
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default)]
    pub companies_file: Option<PathBuf>,
    #[serde(default)]
    pub universe_file: Option<PathBuf>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("assets/data")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            companies_file: None,
            universe_file: None,
        }
    }
}

impl OutputConfig {
    /// Company metadata path, `<dir>/companies.json` unless overridden
    pub fn companies_path(&self) -> PathBuf {
        self.companies_file
            .clone()
            .unwrap_or_else(|| self.dir.join("companies.json"))
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path))?;
        Self::parse(&contents).with_context(|| format!("parsing config file {}", path))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = Config::parse("").unwrap();
        assert_eq!(cfg.system.log_level, "info");
        assert_eq!(cfg.analysis.ma_window, 200);
        assert_eq!(cfg.analysis.ma_min_periods, 50);
        assert_eq!(cfg.analysis.recovery_weeks, 2);
        assert_eq!(cfg.analysis.forward_weeks, 52);
        assert_eq!(cfg.provider.rate_limit_delay_secs, 12);
        assert_eq!(cfg.output.companies_path(), PathBuf::from("assets/data/companies.json"));
    }

    #[test]
    fn test_partial_sections() {
        let cfg = Config::parse(
            r#"
            [system]
            name = "screen"
            log_level = "debug"

            [analysis]
            recovery_weeks = 3

            [output]
            dir = "out"
            companies_file = "meta/companies.json"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.system.name, "screen");
        assert_eq!(cfg.analysis.recovery_weeks, 3);
        assert_eq!(cfg.analysis.ma_window, 200);
        assert_eq!(cfg.output.dir, PathBuf::from("out"));
        assert_eq!(cfg.output.companies_path(), PathBuf::from("meta/companies.json"));
    }

    #[test]
    fn test_rejects_zero_recovery_weeks() {
        let err = Config::parse("[analysis]\nrecovery_weeks = 0\n").unwrap_err();
        assert!(err.to_string().contains("recovery_weeks"));
    }

    #[test]
    fn test_rejects_min_periods_above_window() {
        assert!(Config::parse("[analysis]\nma_window = 10\nma_min_periods = 20\n").is_err());
    }

    #[test]
    fn test_api_key_from_file_wins() {
        let provider = ProviderConfig {
            api_key: " demo ".to_string(),
            ..ProviderConfig::default()
        };
        assert_eq!(provider.resolve_api_key(), Some("demo".to_string()));
    }
}
