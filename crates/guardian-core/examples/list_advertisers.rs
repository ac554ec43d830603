//! Example: Listing Nearby Advertisers
//!
//! Listens for a while and prints every BLE advertiser the adapter saw,
//! flagging the ones that look like a GuardianRX band. Handy when the band
//! will not show up in a normal discovery.
//!
//! Run with: `cargo run --example list_advertisers`

use guardian_core::scan::{BandMatcher, ScanOptions, list_candidates};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let options = ScanOptions::default().duration_ms(8000);
    let candidates = list_candidates(&BandMatcher::default(), &options).await?;

    if candidates.is_empty() {
        println!("No advertisers seen.");
        return Ok(());
    }

    println!("Saw {} advertiser(s):", candidates.len());
    for candidate in &candidates {
        let rssi = candidate
            .rssi
            .map(|r| format!("{} dBm", r))
            .unwrap_or_else(|| "N/A".to_string());
        println!(
            "  {}{}",
            candidate.name.as_deref().unwrap_or("Unknown"),
            if candidate.is_band { "  <- band" } else { "" }
        );
        println!("    Identifier: {}", candidate.identifier);
        println!("    RSSI: {}", rssi);
    }

    Ok(())
}
