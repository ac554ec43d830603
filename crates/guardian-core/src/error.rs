//! Error types for guardian-core.
//!
//! The fallible layer of [`crate::BandLink`] (`try_discover`,
//! `try_send_command`) returns these errors. The public boolean layer
//! (`discover`, `send_command`, `vibrate`, ...) logs them and reports
//! `false`; nothing here is retried automatically.
//!
//! ## Cache invalidation
//!
//! The connect step reports every failure, timeouts included, as
//! [`Error::ConnectionFailed`], and that clears the cached band address.
//! Errors after the connection is up leave it:
//!
//! | Error Type | Clears cached peer? |
//! |------------|---------------------|
//! | [`Error::ConnectionFailed`] | Yes |
//! | [`Error::ServiceNotFound`] | No |
//! | [`Error::CharacteristicNotFound`] | No |
//! | [`Error::WriteNotSupported`] | No |
//! | [`Error::WriteFailed`] | No |
//! | [`Error::DeviceNotFound`] | Nothing was cached |

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when talking to the wristband.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Bluetooth Low Energy error.
    #[error("Bluetooth error: {0}")]
    Bluetooth(#[from] btleplug::Error),

    /// Band not found during scan.
    #[error("Device not found: {0}")]
    DeviceNotFound(DeviceNotFoundReason),

    /// Connection failed with specific reason.
    #[error("Connection failed: {reason}")]
    ConnectionFailed {
        /// The peer that failed to connect.
        device_id: Option<String>,
        /// The structured reason for the failure.
        reason: ConnectionFailureReason,
    },

    /// Operation timed out.
    #[error("Operation '{operation}' timed out after {duration:?}")]
    Timeout {
        /// The operation that timed out.
        operation: String,
        /// The timeout duration.
        duration: Duration,
    },

    /// The band service is not present on the connected peer.
    #[error("Service not found: {uuid}")]
    ServiceNotFound {
        /// The service UUID that was not found.
        uuid: String,
    },

    /// Required BLE characteristic not found on device.
    #[error("Characteristic not found: {uuid} (searched in {service_count} services)")]
    CharacteristicNotFound {
        /// The UUID that was not found.
        uuid: String,
        /// Number of services that were searched.
        service_count: usize,
    },

    /// The characteristic does not accept writes without response.
    #[error("Characteristic {uuid} does not support write without response")]
    WriteNotSupported {
        /// The characteristic UUID.
        uuid: String,
    },

    /// Write operation failed.
    #[error("Write failed to characteristic {uuid}: {reason}")]
    WriteFailed {
        /// The characteristic UUID.
        uuid: String,
        /// The reason for the failure.
        reason: String,
    },

    /// Failed to decode data.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Structured reasons for connection failures.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new reasons
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConnectionFailureReason {
    /// Band is out of range.
    OutOfRange,
    /// Band rejected the connection.
    Rejected,
    /// Connection attempt timed out.
    Timeout,
    /// Generic BLE error.
    BleError(String),
    /// Other/unknown error.
    Other(String),
}

impl std::fmt::Display for ConnectionFailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "band out of range"),
            Self::Rejected => write!(f, "connection rejected by band"),
            Self::Timeout => write!(f, "connection timed out"),
            Self::BleError(msg) => write!(f, "BLE error: {}", msg),
            Self::Other(msg) => write!(f, "{}", msg),
        }
    }
}

/// Reason why the band was not found.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new reasons
/// in future versions without breaking downstream code.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum DeviceNotFoundReason {
    /// Scan finished without a matching advertisement.
    ScanTimeout { duration: Duration },
    /// No Bluetooth adapter available.
    NoAdapter,
}

impl std::fmt::Display for DeviceNotFoundReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScanTimeout { duration } => {
                write!(f, "no band advertised within {:?}", duration)
            }
            Self::NoAdapter => write!(f, "no Bluetooth adapter available"),
        }
    }
}

impl Error {
    /// Create a scan timeout error.
    pub fn scan_timeout(duration: Duration) -> Self {
        Self::DeviceNotFound(DeviceNotFoundReason::ScanTimeout { duration })
    }

    /// Create a timeout error with operation context.
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a service not found error.
    pub fn service_not_found(uuid: impl Into<String>) -> Self {
        Self::ServiceNotFound { uuid: uuid.into() }
    }

    /// Create a characteristic not found error.
    pub fn characteristic_not_found(uuid: impl Into<String>, service_count: usize) -> Self {
        Self::CharacteristicNotFound {
            uuid: uuid.into(),
            service_count,
        }
    }

    /// Create a write-not-supported error.
    pub fn write_not_supported(uuid: impl Into<String>) -> Self {
        Self::WriteNotSupported { uuid: uuid.into() }
    }

    /// Create a write failure with a reason.
    pub fn write_failed(uuid: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            uuid: uuid.into(),
            reason: reason.into(),
        }
    }

    /// Create a connection failure with structured reason.
    pub fn connection_failed(device_id: Option<String>, reason: ConnectionFailureReason) -> Self {
        Self::ConnectionFailed { device_id, reason }
    }

    /// Create a connection failure with a string reason.
    ///
    /// This is a convenience method that wraps the string in `ConnectionFailureReason::Other`.
    pub fn connection_failed_str(device_id: Option<String>, reason: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            device_id,
            reason: ConnectionFailureReason::Other(reason.into()),
        }
    }
}

impl From<guardian_types::ParseError> for Error {
    fn from(err: guardian_types::ParseError) -> Self {
        Error::InvalidData(err.to_string())
    }
}

/// Result type alias using guardian-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
