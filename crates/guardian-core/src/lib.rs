//! BLE central link to the GuardianRX vibration wristband.
//!
//! The pillbox controller uses this crate to make the patient's wristband
//! vibrate when a dose is due, late, or missed. The band is a BLE
//! peripheral exposing one write-without-response characteristic that
//! accepts a 3-byte `(pattern, repeats, strength)` command.
//!
//! # Features
//!
//! - **Discovery**: scan for the band by service UUID or advertised name
//! - **Address cache**: skip rescanning for 60 seconds after a discovery
//! - **Short-lived connections**: connect, write one command, disconnect
//! - **Alert helpers**: fixed patterns for due, late, missed, and snooze
//! - **Mock transport**: exercise the whole flow without hardware
//!
//! Failures never panic and never retry. The boolean layer of
//! [`BandLink`] logs and returns `false`, so an alarm loop can carry on.
//!
//! # Quick Start
//!
//! ```no_run
//! use guardian_core::{BandLink, BtleTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let transport = BtleTransport::new().await?;
//!     let mut link = BandLink::new(transport);
//!
//!     if !link.vibrate_alarm().await {
//!         eprintln!("Band unreachable, falling back to buzzer");
//!     }
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod link;
pub mod mock;
pub mod scan;
pub mod traits;
pub mod transport;

// Re-export the shared type modules from guardian-types
pub use guardian_types::types;
pub use guardian_types::uuid;

// Core exports
pub use cache::{AddressCache, DEFAULT_CACHE_TTL};
pub use error::{ConnectionFailureReason, DeviceNotFoundReason, Error, Result};
pub use link::{BandLink, LinkConfig};
pub use mock::{MockTransport, MockTransportBuilder};
pub use scan::{BandMatcher, Candidate, DEFAULT_SCAN_DURATION, ScanOptions};
pub use traits::{BandTransport, GattTarget};
pub use transport::BtleTransport;

pub use guardian_types::{Alert, Command, Pattern};
