//! Trait abstractions for the wristband transport.
//!
//! This module provides the [`BandTransport`] trait that abstracts over
//! the real Bluetooth stack and the mock transport used in tests.

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use guardian_types::COMMAND_LEN;
use guardian_types::uuid::{BAND_COMMAND, BAND_SERVICE};

use crate::error::Result;
use crate::scan::{BandMatcher, ScanOptions};

/// Service and characteristic a command is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GattTarget {
    /// Service that owns the command characteristic.
    pub service: Uuid,
    /// Characteristic that receives the 3-byte payload.
    pub characteristic: Uuid,
}

impl Default for GattTarget {
    fn default() -> Self {
        Self {
            service: BAND_SERVICE,
            characteristic: BAND_COMMAND,
        }
    }
}

/// The BLE central operations the band link needs.
///
/// A transport knows how to find a peer that matches a [`BandMatcher`],
/// open and close a connection to it, and push one command payload. The
/// [`crate::BandLink`] decides *when* to do each of these; the transport
/// only knows *how*.
///
/// # Example
///
/// ```ignore
/// use guardian_core::{BandTransport, Result};
///
/// async fn ping<T: BandTransport>(transport: &T, peer: &T::Peer) -> Result<()> {
///     transport.connect(peer, Duration::from_millis(1500)).await?;
///     transport.disconnect(peer).await
/// }
/// ```
#[async_trait]
pub trait BandTransport: Send + Sync {
    /// Handle identifying a discovered band.
    type Peer: Clone + Debug + Send + Sync;

    /// Scan for the first advertisement accepted by `matcher`.
    ///
    /// Returns `Ok(None)` when the scan duration elapses without a match.
    /// Scanning must be stopped before returning.
    async fn scan(&self, matcher: &BandMatcher, options: &ScanOptions)
    -> Result<Option<Self::Peer>>;

    /// Open a connection to `peer`, giving up after `timeout`.
    async fn connect(&self, peer: &Self::Peer, timeout: Duration) -> Result<()>;

    /// Locate `target` on the connected peer and write `payload`
    /// without response.
    ///
    /// Must fail with [`crate::Error::WriteNotSupported`] when the
    /// characteristic lacks the write-without-response property.
    async fn write_command(
        &self,
        peer: &Self::Peer,
        target: &GattTarget,
        payload: &[u8; COMMAND_LEN],
        timeout: Duration,
    ) -> Result<()>;

    /// Close the connection to `peer`.
    async fn disconnect(&self, peer: &Self::Peer) -> Result<()>;

    /// Short label for logs (address or platform identifier).
    fn peer_label(&self, peer: &Self::Peer) -> String {
        format!("{:?}", peer)
    }
}
