//! Prints every stable matching found for a hospitals/students market.
//!
//! Usage: `stable-match-demo [market.toml]`
//!
//! The market file holds two tables, `[proposers]` and `[responders]`, each
//! mapping an agent to its ranked list of partners. Without a file the
//! built-in four hospitals / four students example is used.

use stable_match::config::LoggingSettings;
use stable_match::{Market, PreferenceTable};
use std::process::ExitCode;

fn example_market() -> Market {
    Market {
        proposers: PreferenceTable::new()
            .with("H1", ["S1", "S2", "S3", "S4"])
            .with("H2", ["S2", "S1", "S3", "S4"])
            .with("H3", ["S3", "S2", "S1", "S4"])
            .with("H4", ["S4", "S2", "S3", "S1"]),
        responders: PreferenceTable::new()
            .with("S1", ["H2", "H1", "H3", "H4"])
            .with("S2", ["H1", "H2", "H3", "H4"])
            .with("S3", ["H3", "H2", "H1", "H4"])
            .with("S4", ["H4", "H2", "H3", "H1"]),
    }
}

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    LoggingSettings {
        level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "warn".to_string()),
        format: "pretty".to_string(),
    }
    .init();

    let market = match std::env::args().nth(1) {
        Some(path) => match Market::load(&path) {
            Ok(market) => market,
            Err(e) => {
                tracing::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        None => example_market(),
    };

    let model = match market.into_model() {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("Malformed preferences: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let matchings = match model.enumerate_stable() {
        Ok(matchings) => matchings,
        Err(e) => {
            tracing::error!("Enumeration failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Stable matchings found:");
    for (idx, matching) in matchings.iter().enumerate() {
        println!("Matching {}:", idx + 1);
        for (hospital, student) in matching.iter() {
            match student {
                Some(student) => println!("{} is matched with {}", hospital, student),
                None => println!("{} is unmatched", hospital),
            }
        }
        println!();
    }

    ExitCode::SUCCESS
}
