//! Alert command implementation.

use anyhow::{Result, bail};
use guardian_types::Alert;

use super::open_link;
use crate::config::Config;

pub async fn cmd_alert(alert: Alert, quiet: bool, config: &Config) -> Result<()> {
    let mut link = open_link(config).await?;
    if !link.alert(alert).await {
        bail!("Failed to deliver '{}' alert to the band", alert);
    }

    if !quiet {
        println!("Sent '{}' alert ({})", alert, alert.command());
    }
    Ok(())
}
