//! Screening Universe
//!
//! The list of tickers screened each week, plus the company metadata
//! merged into the report.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

/// Default tickers screened when no universe file is configured
pub const DEFAULT_SYMBOLS: &[&str] = &[
    // Speculative / high-interest (12)
    "UUUU", "RKLB", "ASTS", "IONQ", "SMR", "CCJ", "PLTR", "SOFI", "HOOD", "COIN",
    "MSTR", "ARKK",
    // Berkshire holdings (20)
    "AAPL", "BAC", "AXP", "KO", "CVX", "OXY", "KHC", "MCO", "CB", "DVA",
    "C", "KR", "VRSN", "V", "MA", "AMZN", "NU", "AON", "COF", "ALLY",
    // Major S&P 500 (30)
    "MSFT", "GOOGL", "META", "NVDA", "TSLA", "BRK-B", "JPM", "JNJ", "UNH", "XOM",
    "PG", "HD", "MRK", "ABBV", "PEP", "COST", "AVGO", "TMO", "MCD", "WMT",
    "CSCO", "ORCL", "IBM", "QCOM", "CAT", "GE", "AMGN", "INTC", "AMD", "CRM",
    // Value core (10)
    "GILD", "BMY", "VZ", "T", "WBA", "PFE", "F", "GM", "O", "SCHD",
    // Financials (10)
    "WFC", "USB", "PNC", "TFC", "SCHW", "MS", "AIG", "MET", "PRU", "ALL",
    // Utilities (8)
    "DUK", "SO", "D", "AEP", "XEL", "EXC", "ED", "NEE",
    // Consumer staples (10)
    "CL", "GIS", "SJM", "CPB", "CAG", "HRL", "MKC", "CLX", "KMB", "TAP",
    // Healthcare (8)
    "CVS", "CI", "HUM", "CNC", "ELV", "MCK", "VTRS", "LLY",
    // Industrials and defense (12)
    "MMM", "EMR", "ITW", "SWK", "DE", "FDX", "UPS", "NSC", "LMT", "NOC",
    "GD", "BA",
    // Energy and REITs (10)
    "SLB", "HAL", "DVN", "MPC", "VLO", "SPG", "AMT", "CCI", "PSA", "WELL",
    // Retail, media, meme (10)
    "TGT", "SBUX", "NKE", "DIS", "PYPL", "BABA", "GME", "AMC", "NFLX", "CMCSA",
];

/// Set of tickers to screen
#[derive(Debug, Clone)]
pub struct Universe {
    symbols: HashSet<String>,
}

impl Universe {
    /// Create a new universe with default symbols
    pub fn new() -> Self {
        let symbols: HashSet<String> = DEFAULT_SYMBOLS
            .iter()
            .map(|s| s.to_string())
            .collect();

        Self { symbols }
    }

    /// Create universe from a list of symbols
    pub fn from_symbols(symbols: Vec<String>) -> Self {
        Self {
            symbols: symbols
                .into_iter()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Load universe from a file (one symbol per line, `#` comments)
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading universe file {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    fn parse(content: &str) -> Self {
        let symbols: HashSet<String> = content
            .lines()
            .map(|line| line.split('#').next().unwrap_or("").trim())
            .filter(|line| !line.is_empty())
            .map(|s| s.to_uppercase())
            .collect();

        Self { symbols }
    }

    pub fn add(&mut self, symbol: &str) {
        self.symbols.insert(symbol.to_uppercase());
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(&symbol.to_uppercase())
    }

    /// All symbols, sorted for a stable processing order
    pub fn symbols(&self) -> Vec<String> {
        let mut syms: Vec<_> = self.symbols.iter().cloned().collect();
        syms.sort();
        syms
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}

/// Reference data for one company
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CompanyInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub ir_url: Option<String>,
}

/// Company metadata keyed by ticker
#[derive(Debug, Clone, Default)]
pub struct CompanyDirectory {
    companies: HashMap<String, CompanyInfo>,
}

impl CompanyDirectory {
    /// Load `{"AAPL": {"name": ..., "sector": ..., "ir_url": ...}, ...}`
    ///
    /// A missing file is an empty directory.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading company metadata {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("parsing company metadata {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let raw: HashMap<String, CompanyInfo> = serde_json::from_str(content)?;
        let companies = raw
            .into_iter()
            .map(|(k, v)| (k.to_uppercase(), v))
            .collect();
        Ok(Self { companies })
    }

    pub fn get(&self, symbol: &str) -> Option<&CompanyInfo> {
        self.companies.get(&symbol.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.companies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.companies.is_empty()
    }
}
