//! Platform-agnostic types for the GuardianRX vibration wristband.
//!
//! This crate provides the command model shared by the BLE link
//! (guardian-core) and the command-line tool (guardian-cli).
//!
//! # Features
//!
//! - Vibration patterns and the clamped 3-byte [`Command`]
//! - Medication [`Alert`]s and their fixed commands
//! - UUID constants for the band's GATT service
//! - Error types for payload parsing
//!
//! # Example
//!
//! ```
//! use guardian_types::{Alert, Command, Pattern};
//!
//! assert_eq!(Alert::Due.command(), Command::new(Pattern::AlarmDue, 2, 2));
//! ```

pub mod error;
pub mod types;
pub mod uuid;

pub use error::{ParseError, ParseResult};
pub use types::{
    Alert, COMMAND_LEN, Command, MAX_REPEATS, MAX_STRENGTH, MIN_REPEATS, Pattern, clamp_repeats,
    clamp_strength,
};
pub use crate::uuid::{BAND_COMMAND, BAND_NAME, BAND_SERVICE, CENTRAL_NAME};
