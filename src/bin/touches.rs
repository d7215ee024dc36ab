//! Touch Analyzer
//!
//! Screens one ticker from a CSV file and prints its below-the-line history.
//!
//! Usage:
//!   cargo run --bin touches data/AAPL_weekly.csv
//!   cargo run --bin touches data/prices.csv GME

use anyhow::Result;
use std::env;
use std::path::Path;

use belowline::config::AnalysisConfig;
use belowline::data::load_csv;
use belowline::signals::analyze;

fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("================================================================");
        println!("                BELOW THE LINE - TOUCH ANALYZER                 ");
        println!("================================================================");
        println!();
        println!("Usage: touches <csv_file> [symbol]");
        println!();
        println!("Arguments:");
        println!("  csv_file  Weekly price history (required)");
        println!("  symbol    Ticker name (default: derived from filename)");
        println!();
        println!("CSV Format: date,close,adjusted_close[,volume]");
        println!("  - date: YYYY-MM-DD (week ending)");
        println!("  - First row is header (skipped)");
        println!("================================================================");
        return Ok(());
    }

    belowline::init_logging("warn")?;

    let csv_path = &args[1];

    // Derive symbol from filename or use provided
    let symbol = if args.len() > 2 {
        args[2].to_uppercase()
    } else {
        Path::new(csv_path)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .split('_')
            .next()
            .unwrap_or("UNKNOWN")
            .to_uppercase()
    };

    let quotes = load_csv(Path::new(csv_path))?;
    println!("Loaded {} weeks for {}", quotes.len(), symbol);

    let cfg = AnalysisConfig::default();
    let Some(s) = analyze(&symbol, &quotes, &cfg)? else {
        println!("Not enough history to screen (need {}+ weeks).", cfg.min_history_weeks);
        return Ok(());
    };

    println!();
    println!("Current price:  ${:.2}", s.close);
    println!("200-week MA:    ${:.2}", s.wma_200);
    println!("From MA:        {:+.2}% ({})", s.pct_from_wma, s.zone);
    if let Some(rsi) = s.rsi_14 {
        println!("RSI (14w):      {:.1}", rsi);
    }
    println!("Touch count:    {}", s.touch_count);
    if let Some(avg) = s.avg_return_after_touch {
        println!("Avg 1yr return: {:+.1}%", avg);
    }
    println!();
    println!(
        "{:<10} {:>6} {:>8} {:>12} {:>14} {:>10}",
        "Date", "Weeks", "Depth", "1yr Return", "Return Since", "Recovered"
    );
    println!("{}", "-".repeat(65));

    for ep in &s.episodes {
        let r1 = ep
            .forward_return_1yr
            .map_or_else(|| "N/A".to_string(), |r| format!("{:+.1}%", r));
        let rn = ep
            .return_to_present
            .map_or_else(|| "N/A".to_string(), |r| format!("{:+.1}%", r));
        println!(
            "{:<10} {:>6} {:>7.1}% {:>12} {:>14} {:>10}",
            ep.start_label(),
            ep.weeks_below,
            ep.max_depth,
            r1,
            rn,
            ep.recovery_label()
        );
    }

    Ok(())
}
