//! The band link: discover, connect, write, disconnect.
//!
//! [`BandLink`] owns a [`BandTransport`] and the single cached band
//! address. Every command runs the same short sequence:
//!
//! 1. Make sure a band address is known (scan if nothing is cached).
//! 2. Connect, bounded by the operation timeout.
//! 3. Write the 3-byte command without response.
//! 4. Disconnect, whatever the write did.
//!
//! A failed connection forgets the cached address so the next command
//! rescans. Nothing is retried here; callers simply call again.
//!
//! # Two layers
//!
//! `try_*` methods return [`Result`] with the full [`crate::Error`]. The
//! plain methods (`discover`, `send_command`, `vibrate`, `alert`, ...) log
//! the error at `warn` level and return `bool`, which is what an alarm loop
//! wants: an alert that cannot be delivered must never stall it.

use std::time::Duration;

use tracing::{debug, info, warn};

use guardian_types::{Alert, Command, Pattern};
use guardian_types::uuid::BAND_NAME;

use crate::cache::{AddressCache, DEFAULT_CACHE_TTL};
use crate::error::{Error, Result};
use crate::scan::{BandMatcher, DEFAULT_SCAN_DURATION, ScanOptions};
use crate::traits::{BandTransport, GattTarget};

/// Default bound for connect, service discovery, and write.
const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_millis(1500);

/// Timeouts and matching rules for a [`BandLink`].
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use guardian_core::LinkConfig;
///
/// let config = LinkConfig::default()
///     .scan_timeout(Duration::from_secs(8))
///     .band_name(Some("Ward-3 Band"));
/// assert_eq!(config.cache_ttl, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// How long `discover` listens when no fresh address is cached.
    pub scan_timeout: Duration,
    /// Bound for connect, service discovery, and write.
    pub operation_timeout: Duration,
    /// How long a discovered address skips rescanning.
    pub cache_ttl: Duration,
    /// Exact advertised name to accept, in addition to the service UUID.
    pub band_name: Option<String>,
    /// Where commands are written.
    pub target: GattTarget,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            scan_timeout: DEFAULT_SCAN_DURATION,
            operation_timeout: DEFAULT_OPERATION_TIMEOUT,
            cache_ttl: DEFAULT_CACHE_TTL,
            band_name: Some(BAND_NAME.to_string()),
            target: GattTarget::default(),
        }
    }
}

impl LinkConfig {
    /// Create a new link config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan timeout.
    #[must_use]
    pub fn scan_timeout(mut self, timeout: Duration) -> Self {
        self.scan_timeout = timeout;
        self
    }

    /// Set the operation timeout.
    #[must_use]
    pub fn operation_timeout(mut self, timeout: Duration) -> Self {
        self.operation_timeout = timeout;
        self
    }

    /// Set how long a discovered address stays fresh.
    #[must_use]
    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    /// Set the advertised name to match. `None` matches on service only.
    #[must_use]
    pub fn band_name(mut self, name: Option<&str>) -> Self {
        self.band_name = name.map(str::to_string);
        self
    }

    /// Set the GATT service and characteristic commands go to.
    #[must_use]
    pub fn target(mut self, target: GattTarget) -> Self {
        self.target = target;
        self
    }

    /// The advertisement matcher these settings describe.
    pub fn matcher(&self) -> BandMatcher {
        BandMatcher::new(self.band_name.clone(), self.target.service)
    }
}

/// Central-side link to the vibration wristband.
///
/// Operations take `&mut self`: there is one cached address and at most one
/// operation in flight.
pub struct BandLink<T: BandTransport> {
    transport: T,
    config: LinkConfig,
    cache: AddressCache<T::Peer>,
}

impl<T: BandTransport> std::fmt::Debug for BandLink<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BandLink")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl<T: BandTransport> BandLink<T> {
    /// Create a link with default timeouts.
    pub fn new(transport: T) -> Self {
        Self::with_config(transport, LinkConfig::default())
    }

    /// Create a link with custom configuration.
    pub fn with_config(transport: T, config: LinkConfig) -> Self {
        Self {
            transport,
            config,
            cache: AddressCache::new(),
        }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The link configuration.
    pub fn config(&self) -> &LinkConfig {
        &self.config
    }

    /// The cached band address and its age.
    pub fn cache(&self) -> &AddressCache<T::Peer> {
        &self.cache
    }

    /// The cached band, fresh or stale.
    pub fn cached_peer(&self) -> Option<&T::Peer> {
        self.cache.peer()
    }

    /// Forget the cached band so the next operation rescans.
    pub fn forget(&mut self) {
        self.cache.invalidate();
    }

    /// Make sure a band address is known, scanning for up to `scan_timeout`.
    ///
    /// Returns immediately when the cached address is younger than the
    /// configured TTL. Otherwise the stale entry is dropped before
    /// scanning, so a failed scan leaves the cache empty.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn try_discover(&mut self, scan_timeout: Duration) -> Result<()> {
        if self.cache.is_fresh(self.config.cache_ttl) {
            debug!("Cache hit, skipping scan");
            return Ok(());
        }

        self.cache.invalidate();
        let options = ScanOptions::new().duration(scan_timeout);
        match self.transport.scan(&self.config.matcher(), &options).await? {
            Some(peer) => {
                info!("Band discovered at {}", self.transport.peer_label(&peer));
                self.cache.record(peer);
                Ok(())
            }
            None => Err(Error::scan_timeout(scan_timeout)),
        }
    }

    /// Send `command`, connecting for at most `op_timeout`.
    ///
    /// A cached address is reused even when stale; only a missing address
    /// triggers a scan (with the configured scan timeout). The connection
    /// is always closed after the write attempt.
    #[tracing::instrument(level = "debug", skip(self, command), fields(command = %command))]
    pub async fn try_send_command(&mut self, command: Command, op_timeout: Duration) -> Result<()> {
        if self.cache.is_empty() {
            self.try_discover(self.config.scan_timeout).await?;
        }
        let Some(peer) = self.cache.peer().cloned() else {
            return Err(Error::scan_timeout(self.config.scan_timeout));
        };
        let label = self.transport.peer_label(&peer);

        if let Err(e) = self.transport.connect(&peer, op_timeout).await {
            warn!("Connection to {} failed, forgetting address: {}", label, e);
            self.cache.invalidate();
            return Err(e);
        }

        let payload = command.to_bytes();
        let written = self
            .transport
            .write_command(&peer, &self.config.target, &payload, op_timeout)
            .await;

        if let Err(e) = self.transport.disconnect(&peer).await {
            debug!("Disconnect from {} failed: {}", label, e);
        }

        if written.is_ok() {
            info!("Sent {} to {}", command, label);
        }
        written
    }

    /// Boolean form of [`BandLink::try_discover`].
    pub async fn discover(&mut self, scan_timeout: Duration) -> bool {
        match self.try_discover(scan_timeout).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Band discovery failed: {}", e);
                false
            }
        }
    }

    /// Send a raw command tuple. `repeats` and `strength` are clamped.
    ///
    /// Returns whether the write was issued successfully.
    pub async fn send_command(
        &mut self,
        pattern: Pattern,
        repeats: u8,
        strength: u8,
        op_timeout: Duration,
    ) -> bool {
        self.send(Command::new(pattern, repeats, strength), op_timeout)
            .await
    }

    /// Send a prepared command.
    pub async fn send(&mut self, command: Command, op_timeout: Duration) -> bool {
        match self.try_send_command(command, op_timeout).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to send {}: {}", command, e);
                false
            }
        }
    }

    /// Vibrate with the configured operation timeout.
    pub async fn vibrate(&mut self, pattern: Pattern, repeats: u8, strength: u8) -> bool {
        let op_timeout = self.config.operation_timeout;
        self.send_command(pattern, repeats, strength, op_timeout)
            .await
    }

    /// Send the fixed command for `alert`.
    pub async fn alert(&mut self, alert: Alert) -> bool {
        let op_timeout = self.config.operation_timeout;
        self.send(alert.command(), op_timeout).await
    }

    /// Dose due: `(1, 2, 2)`.
    pub async fn vibrate_alarm(&mut self) -> bool {
        self.alert(Alert::Due).await
    }

    /// Dose late: `(2, 2, 1)`.
    pub async fn vibrate_late(&mut self) -> bool {
        self.alert(Alert::Late).await
    }

    /// Dose missed: `(3, 3, 2)`.
    pub async fn vibrate_missed(&mut self) -> bool {
        self.alert(Alert::Missed).await
    }

    /// Snooze nudge: `(4, 1, 1)`.
    pub async fn vibrate_short(&mut self) -> bool {
        self.alert(Alert::Snooze).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_config_defaults() {
        let config = LinkConfig::default();
        assert_eq!(config.scan_timeout, Duration::from_secs(4));
        assert_eq!(config.operation_timeout, Duration::from_millis(1500));
        assert_eq!(config.cache_ttl, Duration::from_secs(60));
        assert_eq!(config.band_name.as_deref(), Some("GuardianRX-Band"));
        assert_eq!(config.target, GattTarget::default());
    }

    #[test]
    fn test_link_config_builder() {
        let config = LinkConfig::new()
            .scan_timeout(Duration::from_secs(10))
            .operation_timeout(Duration::from_secs(3))
            .cache_ttl(Duration::from_secs(5))
            .band_name(None);
        assert_eq!(config.scan_timeout, Duration::from_secs(10));
        assert_eq!(config.operation_timeout, Duration::from_secs(3));
        assert_eq!(config.cache_ttl, Duration::from_secs(5));
        assert!(config.band_name.is_none());
    }

    #[test]
    fn test_matcher_follows_config() {
        let config = LinkConfig::default().band_name(Some("Ward-3 Band"));
        let matcher = config.matcher();
        assert_eq!(matcher.name.as_deref(), Some("Ward-3 Band"));
        assert_eq!(matcher.service, config.target.service);
    }
}
