//! Command implementations for the CLI.

mod alert;
mod config;
mod discover;
mod scan;
mod vibrate;

pub use alert::cmd_alert;
pub use config::cmd_config;
pub use discover::cmd_discover;
pub use scan::cmd_scan;
pub use vibrate::cmd_vibrate;

use anyhow::{Context, Result};
use guardian_core::{BandLink, BtleTransport};

use crate::config::Config;

/// Open a link on the first Bluetooth adapter using the `[band]` settings.
async fn open_link(config: &Config) -> Result<BandLink<BtleTransport>> {
    let transport = BtleTransport::new()
        .await
        .context("No usable Bluetooth adapter")?;
    Ok(BandLink::with_config(transport, config.band.link_config()))
}
