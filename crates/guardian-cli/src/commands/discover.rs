//! Discover command implementation.

use std::time::Duration;

use anyhow::{Result, bail};
use guardian_core::BandTransport;

use super::open_link;
use crate::config::Config;

pub async fn cmd_discover(timeout: Duration, config: &Config) -> Result<()> {
    let mut link = open_link(config).await?;

    if !link.discover(timeout).await {
        bail!("No band found within {:.1}s", timeout.as_secs_f64());
    }
    if let Some(peer) = link.cached_peer() {
        println!("Band found at {}", link.transport().peer_label(peer));
    }
    Ok(())
}
