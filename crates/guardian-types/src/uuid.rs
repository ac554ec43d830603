//! Bluetooth identifiers for the GuardianRX wristband.
//!
//! The band exposes a Nordic UART style service with a single
//! write-without-response characteristic that accepts 3-byte commands.

use uuid::{Uuid, uuid};

/// Wristband command service.
pub const BAND_SERVICE: Uuid = uuid!("6e400001-b5a3-f393-e0a9-e50e24dcca9e");

/// Command characteristic (write without response, 3-byte payload).
pub const BAND_COMMAND: Uuid = uuid!("6e400002-b5a3-f393-e0a9-e50e24dcca9e");

/// Local name the wristband advertises.
pub const BAND_NAME: &str = "GuardianRX-Band";

/// Name the pillbox central announces itself with.
pub const CENTRAL_NAME: &str = "GuardianRX-Pillbox";
