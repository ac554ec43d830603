//! Example: Sending Alerts to the Band
//!
//! Discovers the GuardianRX band, then plays each medication alert in turn
//! with a pause between them. The second and later alerts reuse the cached
//! address instead of scanning again.
//!
//! Run with: `cargo run --example vibrate_band`

use std::time::Duration;

use guardian_core::{Alert, BandLink, BtleTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let transport = BtleTransport::new().await?;
    let mut link = BandLink::new(transport);

    println!("Looking for the band...");
    if !link.discover(Duration::from_secs(6)).await {
        println!("No band found.");
        println!();
        println!("Make sure:");
        println!("  - The band is charged and switched on");
        println!("  - Bluetooth is enabled on this computer");
        println!("  - No other central is connected to the band");
        return Ok(());
    }

    for alert in Alert::ALL {
        let command = alert.command();
        let sent = link.alert(alert).await;
        println!(
            "  {:<7} {} -> {}",
            alert.as_str(),
            command,
            if sent { "sent" } else { "FAILED" }
        );
        tokio::time::sleep(Duration::from_secs(3)).await;
    }

    Ok(())
}
