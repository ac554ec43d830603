//! `guardian`: pillbox-side tools for the GuardianRX wristband.
//!
//! | Command | Description |
//! |---------|-------------|
//! | `scan` | List advertisers and mark band matches |
//! | `discover` | Find the band once and print its address |
//! | `vibrate` | Send one `(pattern, repeats, strength)` command |
//! | `alert` | Send the due, late, missed, or snooze alert |
//! | `config` | Show, create, or check the configuration file |
//! | `completions` | Generate shell completions |
//!
//! Commands that talk to the band exit with status 1 when the band cannot
//! be reached.

mod cli;
mod commands;
mod config;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use commands::{cmd_alert, cmd_config, cmd_discover, cmd_scan, cmd_vibrate};
use config::{Config, default_config_path};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Handle completions command early (before tracing init)
    if let Commands::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        clap_complete::generate(shell, &mut cmd, "guardian", &mut io::stdout());
        return Ok(());
    }

    let filter = if cli.quiet {
        EnvFilter::new("warn")
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Commands::Config { action } = cli.command {
        let path = cli.config.unwrap_or_else(default_config_path);
        return cmd_config(action, &path);
    }

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    config.validate()?;
    let scan_timeout = |secs: Option<u64>| {
        secs.map(Duration::from_secs)
            .unwrap_or_else(|| config.band.scan_timeout())
    };

    match cli.command {
        Commands::Scan { timeout, all } => {
            cmd_scan(scan_timeout(timeout), all, cli.quiet, &config).await?;
        }
        Commands::Discover { timeout } => {
            cmd_discover(scan_timeout(timeout), &config).await?;
        }
        Commands::Vibrate {
            pattern,
            repeats,
            strength,
        } => {
            cmd_vibrate(pattern, repeats, strength, cli.quiet, &config).await?;
        }
        Commands::Alert { alert } => {
            cmd_alert(alert, cli.quiet, &config).await?;
        }
        Commands::Config { .. } | Commands::Completions { .. } => {}
    }

    Ok(())
}
