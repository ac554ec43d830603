//! Vibrate command implementation.

use anyhow::{Result, bail};
use guardian_types::{Command, Pattern};
use tracing::warn;

use super::open_link;
use crate::config::Config;

pub async fn cmd_vibrate(
    pattern: Pattern,
    repeats: u8,
    strength: u8,
    quiet: bool,
    config: &Config,
) -> Result<()> {
    let command = Command::new(pattern, repeats, strength);
    if command.repeats() != repeats || command.strength() != strength {
        warn!(
            "Requested repeats={} strength={} clamped to repeats={} strength={}",
            repeats,
            strength,
            command.repeats(),
            command.strength()
        );
    }

    let mut link = open_link(config).await?;
    let op_timeout = link.config().operation_timeout;
    if !link.send(command, op_timeout).await {
        bail!("Failed to send {} to the band", command);
    }

    if !quiet {
        println!("Sent {}", command);
    }
    Ok(())
}
