//! Scan command implementation.

use std::time::Duration;

use anyhow::{Context, Result};
use guardian_core::scan::{ScanOptions, list_candidates};

use crate::config::Config;

pub async fn cmd_scan(timeout: Duration, all: bool, quiet: bool, config: &Config) -> Result<()> {
    let matcher = config.band.link_config().matcher();
    let options = ScanOptions::default().duration(timeout);

    let candidates = list_candidates(&matcher, &options)
        .await
        .context("Failed to scan for advertisers")?;
    let shown: Vec<_> = candidates.iter().filter(|c| all || c.is_band).collect();

    if shown.is_empty() {
        println!("No band advertising.");
        if !quiet {
            println!();
            println!("Make sure:");
            println!("  - The band is charged and switched on");
            println!("  - It is within a few metres of this adapter");
            println!("  - No other central is holding a connection to it");
            if !all && !candidates.is_empty() {
                println!(
                    "  ({} other advertiser(s) seen, use --all to list them)",
                    candidates.len()
                );
            }
        }
        return Ok(());
    }

    println!("{:<4} {:<24} {:<40} RSSI", "", "NAME", "IDENTIFIER");
    for candidate in shown {
        let rssi = candidate
            .rssi
            .map(|r| format!("{} dBm", r))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "{:<4} {:<24} {:<40} {}",
            if candidate.is_band { "*" } else { "" },
            candidate.name.as_deref().unwrap_or("Unknown"),
            candidate.identifier,
            rssi
        );
    }
    Ok(())
}
