//! Hardware tests for guardian-core
//!
//! These tests need a powered GuardianRX band in range and should be run with:
//! `cargo test --package guardian-core --test hardware_tests -- --ignored --nocapture`
//!
//! Set GUARDIAN_BAND to match a band advertising under a different name:
//! `GUARDIAN_BAND="Ward-3 Band" cargo test --package guardian-core -- --ignored`
//!
//! If not set, tests match on "GuardianRX-Band" or the band service UUID.

use std::env;
use std::time::Duration;

use guardian_core::scan::{BandMatcher, ScanOptions, list_candidates, scan_for_band};
use guardian_core::{BandLink, BandTransport, BtleTransport, LinkConfig};

/// Get the band name from environment or use default.
fn band_name() -> String {
    env::var("GUARDIAN_BAND").unwrap_or_else(|_| guardian_core::uuid::BAND_NAME.to_string())
}

async fn hardware_link() -> BandLink<BtleTransport> {
    let transport = match BtleTransport::new().await {
        Ok(t) => t,
        Err(e) => panic!("No Bluetooth adapter: {}", e),
    };
    let config = LinkConfig::default().band_name(Some(&band_name()));
    BandLink::with_config(transport, config)
}

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_list_advertisers() {
    let matcher = BandMatcher::new(Some(band_name()), guardian_core::uuid::BAND_SERVICE);
    let options = ScanOptions::default().duration(Duration::from_secs(8));

    match list_candidates(&matcher, &options).await {
        Ok(candidates) => {
            println!("Saw {} advertisers", candidates.len());
            for c in &candidates {
                println!(
                    "  {} {} rssi={:?}{}",
                    c.identifier,
                    c.name.as_deref().unwrap_or("Unknown"),
                    c.rssi,
                    if c.is_band { " [band]" } else { "" }
                );
            }
            assert!(candidates.iter().any(|c| c.is_band), "band not advertising");
        }
        Err(e) => panic!("Scan failed: {}", e),
    }
}

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_scan_for_band() {
    let matcher = BandMatcher::new(Some(band_name()), guardian_core::uuid::BAND_SERVICE);
    let options = ScanOptions::default().duration(Duration::from_secs(8));

    if let Err(e) = scan_for_band(&matcher, &options).await {
        panic!("Band not found: {}", e);
    }
}

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_discover_band() {
    let mut link = hardware_link().await;
    assert!(link.discover(Duration::from_secs(8)).await, "band not found");
    if let Some(peer) = link.cached_peer() {
        println!("Band at {}", link.transport().peer_label(peer));
    }
}

#[tokio::test]
#[ignore = "requires BLE hardware"]
async fn test_short_nudge() {
    let mut link = hardware_link().await;
    assert!(link.vibrate_short().await, "snooze nudge was not delivered");

    // Second send reuses the cached address
    tokio::time::sleep(Duration::from_secs(2)).await;
    assert!(link.vibrate_short().await);
}
