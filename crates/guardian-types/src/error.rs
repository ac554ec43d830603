//! Error types for data parsing in guardian-types.

use thiserror::Error;

/// Errors that can occur when decoding band commands or alert names.
///
/// This error type is platform-agnostic and does not include
/// BLE-specific errors (those belong in guardian-core).
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Not enough bytes to decode a command payload.
    #[error("Command payload requires {expected} bytes, got {actual}")]
    InsufficientBytes {
        /// Expected payload size.
        expected: usize,
        /// Actual payload size received.
        actual: usize,
    },

    /// Byte value does not name a vibration pattern.
    #[error("Unknown vibration pattern: {0}")]
    UnknownPattern(u8),

    /// Text does not name a vibration pattern.
    #[error("Unknown vibration pattern name: '{0}'")]
    UnknownPatternName(String),

    /// Text does not name an alert.
    #[error("Unknown alert '{0}' (expected due, late, missed or snooze)")]
    UnknownAlert(String),
}

/// Result type alias using guardian-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
