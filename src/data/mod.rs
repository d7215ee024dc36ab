//! Data Module
//!
//! Weekly price history sources.
//! - Alpha Vantage REST API for the weekly batch run
//! - CSV files for offline analysis

pub mod alpha_vantage;
pub mod csv;

pub use alpha_vantage::{parse_weekly_response, AlphaVantageClient};
pub use csv::load_csv;
