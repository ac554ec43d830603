//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use guardian_types::{Alert, Pattern};

#[derive(Parser)]
#[command(name = "guardian")]
#[command(author, version, about = "Pillbox-side tools for the GuardianRX wristband", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (defaults to the per-user config directory)
    #[arg(short, long, global = true, env = "GUARDIAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List nearby advertisers and mark the ones that look like the band
    Scan {
        /// Scan duration in seconds (defaults to the configured scan timeout)
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Show every advertiser, not just band matches
        #[arg(short, long)]
        all: bool,
    },

    /// Look for the band once and report its address
    Discover {
        /// Scan duration in seconds (defaults to the configured scan timeout)
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Send one vibration command
    Vibrate {
        /// Pattern name (due, late, missed, short) or number 1-4
        #[arg(short, long, value_parser = parse_pattern)]
        pattern: Pattern,

        /// Number of repeats (clamped to 1-5)
        #[arg(short = 'n', long, default_value = "1")]
        repeats: u8,

        /// Motor strength (clamped to 0-3)
        #[arg(short, long, default_value = "1")]
        strength: u8,
    },

    /// Send a medication alert (due, late, missed, snooze)
    Alert {
        /// Alert to send
        #[arg(value_parser = parse_alert)]
        alert: Alert,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Configuration subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum ConfigAction {
    /// Show configuration file path
    Path,

    /// Show current configuration (secrets masked)
    Show,

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Check the configuration file for errors
    Validate,
}

fn parse_pattern(s: &str) -> Result<Pattern, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid pattern '{}'. Valid values: due, late, missed, short, or 1-4",
            s
        )
    })
}

fn parse_alert(s: &str) -> Result<Alert, String> {
    s.parse().map_err(|_| {
        format!(
            "Invalid alert '{}'. Valid values: due, late, missed, snooze",
            s
        )
    })
}
