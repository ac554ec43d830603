//! Mock transport for testing.
//!
//! [`MockTransport`] implements [`BandTransport`] without any Bluetooth
//! hardware, so [`crate::BandLink`] behaviour can be exercised in unit and
//! integration tests.
//!
//! # Features
//!
//! - **Visibility**: make the band appear or disappear from scans
//! - **Failure injection**: refuse connections, hide the service or
//!   characteristic, drop write-without-response support, reject writes
//! - **Latency simulation**: delay scan results or hang connections
//! - **Inspection**: count scans, connects, and disconnects, and record
//!   every payload written

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::time::sleep;

use guardian_types::{COMMAND_LEN, Command};

use crate::error::{ConnectionFailureReason, Error, Result};
use crate::scan::{BandMatcher, ScanOptions};
use crate::traits::{BandTransport, GattTarget};

/// Whole milliseconds in `d`, pinned at `u64::MAX`.
fn saturating_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// A simulated band reachable through a simulated adapter.
///
/// # Example
///
/// ```
/// use guardian_core::{BandLink, MockTransport};
///
/// #[tokio::main]
/// async fn main() {
///     let mut link = BandLink::new(MockTransport::new());
///     assert!(link.vibrate_alarm().await);
///     assert_eq!(link.transport().written().await, vec![[1, 2, 2]]);
/// }
/// ```
pub struct MockTransport {
    address: RwLock<String>,
    name: String,
    visible: AtomicBool,
    connected: AtomicBool,
    has_service: AtomicBool,
    has_characteristic: AtomicBool,
    write_without_response: AtomicBool,
    reject_writes: AtomicBool,
    refuse_connections: AtomicBool,
    hang_connections: AtomicBool,
    /// Number of connects to refuse before accepting again.
    remaining_connect_failures: AtomicU32,
    /// Simulated delay before a visible band is reported (milliseconds).
    scan_latency_ms: AtomicU64,
    scan_count: AtomicU32,
    connect_count: AtomicU32,
    disconnect_count: AtomicU32,
    writes: RwLock<Vec<[u8; COMMAND_LEN]>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("name", &self.name)
            .field("visible", &self.visible.load(Ordering::Relaxed))
            .field("connected", &self.connected.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// A visible, healthy band named `GuardianRX-Band`.
    pub fn new() -> Self {
        MockTransportBuilder::new().build()
    }

    /// Start building a customised mock.
    pub fn builder() -> MockTransportBuilder {
        MockTransportBuilder::new()
    }

    // --- Test control methods ---

    /// Make the band appear in, or vanish from, scans.
    pub fn set_visible(&self, visible: bool) {
        self.visible.store(visible, Ordering::Relaxed);
    }

    /// Change the address the band advertises from.
    pub async fn set_address(&self, address: &str) {
        *self.address.write().await = address.to_string();
    }

    /// Refuse (or accept) every connection attempt.
    pub fn set_refuse_connections(&self, refuse: bool) {
        self.refuse_connections.store(refuse, Ordering::Relaxed);
    }

    /// Refuse the next `count` connection attempts, then accept.
    pub fn set_transient_connect_failures(&self, count: u32) {
        self.remaining_connect_failures
            .store(count, Ordering::Relaxed);
    }

    /// Make connection attempts hang until the caller's timeout expires.
    pub fn set_hang_connections(&self, hang: bool) {
        self.hang_connections.store(hang, Ordering::Relaxed);
    }

    /// Remove or restore the band service.
    pub fn set_has_service(&self, present: bool) {
        self.has_service.store(present, Ordering::Relaxed);
    }

    /// Remove or restore the command characteristic.
    pub fn set_has_characteristic(&self, present: bool) {
        self.has_characteristic.store(present, Ordering::Relaxed);
    }

    /// Toggle the write-without-response property.
    pub fn set_write_without_response(&self, supported: bool) {
        self.write_without_response
            .store(supported, Ordering::Relaxed);
    }

    /// Make the band reject writes.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::Relaxed);
    }

    /// Set simulated scan latency for a visible band.
    ///
    /// Set to `Duration::ZERO` to disable latency simulation.
    pub fn set_scan_latency(&self, latency: Duration) {
        self.scan_latency_ms
            .store(saturating_millis(latency), Ordering::Relaxed);
    }

    // --- Inspection ---

    /// Number of scans started.
    pub fn scan_count(&self) -> u32 {
        self.scan_count.load(Ordering::Relaxed)
    }

    /// Number of connection attempts.
    pub fn connect_count(&self) -> u32 {
        self.connect_count.load(Ordering::Relaxed)
    }

    /// Number of disconnects.
    pub fn disconnect_count(&self) -> u32 {
        self.disconnect_count.load(Ordering::Relaxed)
    }

    /// Whether a connection is currently open.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Every payload written so far, oldest first.
    pub async fn written(&self) -> Vec<[u8; COMMAND_LEN]> {
        self.writes.read().await.clone()
    }

    /// Decoded form of [`MockTransport::written`].
    pub async fn written_commands(&self) -> Result<Vec<Command>> {
        self.writes
            .read()
            .await
            .iter()
            .map(|payload| Command::from_bytes(payload).map_err(Error::from))
            .collect()
    }

    /// Reset counters and the write log.
    pub async fn reset_counters(&self) {
        self.scan_count.store(0, Ordering::Relaxed);
        self.connect_count.store(0, Ordering::Relaxed);
        self.disconnect_count.store(0, Ordering::Relaxed);
        self.writes.write().await.clear();
    }

    fn advertised_services(&self) -> Vec<uuid::Uuid> {
        if self.has_service.load(Ordering::Relaxed) {
            vec![GattTarget::default().service]
        } else {
            Vec::new()
        }
    }
}

#[async_trait]
impl BandTransport for MockTransport {
    type Peer = String;

    async fn scan(
        &self,
        matcher: &BandMatcher,
        options: &ScanOptions,
    ) -> Result<Option<Self::Peer>> {
        self.scan_count.fetch_add(1, Ordering::Relaxed);

        let latency = Duration::from_millis(self.scan_latency_ms.load(Ordering::Relaxed));
        let services = self.advertised_services();
        let seen = self.visible.load(Ordering::Relaxed)
            && matcher.matches(Some(self.name.as_str()), services.iter());

        if !seen || latency >= options.duration {
            sleep(options.duration).await;
            return Ok(None);
        }

        sleep(latency).await;
        Ok(Some(self.address.read().await.clone()))
    }

    async fn connect(&self, peer: &Self::Peer, timeout: Duration) -> Result<()> {
        self.connect_count.fetch_add(1, Ordering::Relaxed);

        if self.hang_connections.load(Ordering::Relaxed) {
            sleep(timeout).await;
            return Err(Error::connection_failed(
                Some(peer.clone()),
                ConnectionFailureReason::Timeout,
            ));
        }

        if self.remaining_connect_failures.load(Ordering::Relaxed) > 0 {
            self.remaining_connect_failures
                .fetch_sub(1, Ordering::Relaxed);
            return Err(Error::connection_failed(
                Some(peer.clone()),
                ConnectionFailureReason::Rejected,
            ));
        }

        let current = self.address.read().await;
        if self.refuse_connections.load(Ordering::Relaxed) || *peer != *current {
            return Err(Error::connection_failed(
                Some(peer.clone()),
                ConnectionFailureReason::OutOfRange,
            ));
        }

        self.connected.store(true, Ordering::Relaxed);
        Ok(())
    }

    async fn write_command(
        &self,
        peer: &Self::Peer,
        target: &GattTarget,
        payload: &[u8; COMMAND_LEN],
        _timeout: Duration,
    ) -> Result<()> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(Error::connection_failed_str(
                Some(peer.clone()),
                "not connected",
            ));
        }
        if !self.has_service.load(Ordering::Relaxed) || target.service != GattTarget::default().service
        {
            return Err(Error::service_not_found(target.service.to_string()));
        }
        if !self.has_characteristic.load(Ordering::Relaxed)
            || target.characteristic != GattTarget::default().characteristic
        {
            return Err(Error::characteristic_not_found(
                target.characteristic.to_string(),
                1,
            ));
        }
        if !self.write_without_response.load(Ordering::Relaxed) {
            return Err(Error::write_not_supported(target.characteristic.to_string()));
        }
        if self.reject_writes.load(Ordering::Relaxed) {
            return Err(Error::write_failed(
                target.characteristic.to_string(),
                "rejected by band",
            ));
        }

        self.writes.write().await.push(*payload);
        Ok(())
    }

    async fn disconnect(&self, _peer: &Self::Peer) -> Result<()> {
        self.disconnect_count.fetch_add(1, Ordering::Relaxed);
        self.connected.store(false, Ordering::Relaxed);
        Ok(())
    }

    fn peer_label(&self, peer: &Self::Peer) -> String {
        peer.clone()
    }
}

/// Builder for [`MockTransport`].
#[derive(Debug, Clone)]
pub struct MockTransportBuilder {
    address: String,
    name: String,
    visible: bool,
    has_service: bool,
    write_without_response: bool,
    scan_latency: Duration,
}

impl Default for MockTransportBuilder {
    fn default() -> Self {
        Self {
            address: "C0:FF:EE:00:00:01".to_string(),
            name: guardian_types::BAND_NAME.to_string(),
            visible: true,
            has_service: true,
            write_without_response: true,
            scan_latency: Duration::from_millis(200),
        }
    }
}

impl MockTransportBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the band address.
    #[must_use]
    pub fn address(mut self, address: &str) -> Self {
        self.address = address.to_string();
        self
    }

    /// Set the advertised local name.
    #[must_use]
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Whether the band starts out advertising.
    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Whether the band exposes (and advertises) its service.
    #[must_use]
    pub fn has_service(mut self, present: bool) -> Self {
        self.has_service = present;
        self
    }

    /// Whether the command characteristic allows write without response.
    #[must_use]
    pub fn write_without_response(mut self, supported: bool) -> Self {
        self.write_without_response = supported;
        self
    }

    /// Delay before a visible band shows up in a scan.
    #[must_use]
    pub fn scan_latency(mut self, latency: Duration) -> Self {
        self.scan_latency = latency;
        self
    }

    /// Build the mock.
    #[must_use]
    pub fn build(self) -> MockTransport {
        MockTransport {
            address: RwLock::new(self.address),
            name: self.name,
            visible: AtomicBool::new(self.visible),
            connected: AtomicBool::new(false),
            has_service: AtomicBool::new(self.has_service),
            has_characteristic: AtomicBool::new(true),
            write_without_response: AtomicBool::new(self.write_without_response),
            reject_writes: AtomicBool::new(false),
            refuse_connections: AtomicBool::new(false),
            hang_connections: AtomicBool::new(false),
            remaining_connect_failures: AtomicU32::new(0),
            scan_latency_ms: AtomicU64::new(saturating_millis(self.scan_latency)),
            scan_count: AtomicU32::new(0),
            connect_count: AtomicU32::new(0),
            disconnect_count: AtomicU32::new(0),
            writes: RwLock::new(Vec::new()),
        }
    }
}
