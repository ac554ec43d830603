//! Wristband discovery.
//!
//! A band is recognised from its advertisement alone: either it lists the
//! band service UUID, or it advertises the configured local name. The first
//! match ends the scan.

use std::pin::Pin;
use std::time::Duration;

use btleplug::api::{
    BDAddr, Central, CentralEvent, Manager as _, Peripheral as _, PeripheralProperties, ScanFilter,
};
use btleplug::platform::{Adapter, Manager, Peripheral, PeripheralId};
use futures::{Stream, StreamExt};
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{DeviceNotFoundReason, Error, Result};
use guardian_types::uuid::{BAND_NAME, BAND_SERVICE};

/// Default time to listen for advertisements.
pub const DEFAULT_SCAN_DURATION: Duration = Duration::from_secs(4);

/// Options for scanning.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// How long to listen before giving up.
    pub duration: Duration,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            duration: DEFAULT_SCAN_DURATION,
        }
    }
}

impl ScanOptions {
    /// Create new scan options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scan duration.
    #[must_use]
    pub fn duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the scan duration in milliseconds.
    #[must_use]
    pub fn duration_ms(mut self, ms: u64) -> Self {
        self.duration = Duration::from_millis(ms);
        self
    }
}

/// Decides whether an advertisement comes from the wristband.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandMatcher {
    /// Exact local name to accept. `None` disables name matching.
    pub name: Option<String>,
    /// Service UUID to accept.
    pub service: Uuid,
}

impl Default for BandMatcher {
    fn default() -> Self {
        Self {
            name: Some(BAND_NAME.to_string()),
            service: BAND_SERVICE,
        }
    }
}

impl BandMatcher {
    /// Match on `service` or an exact `name`.
    pub fn new(name: Option<String>, service: Uuid) -> Self {
        Self { name, service }
    }

    /// Check an advertisement's local name and service UUIDs.
    ///
    /// The name comparison is exact and case-sensitive, as the band
    /// firmware advertises a fixed name.
    pub fn matches<'a>(
        &self,
        local_name: Option<&str>,
        services: impl IntoIterator<Item = &'a Uuid>,
    ) -> bool {
        if services.into_iter().any(|uuid| *uuid == self.service) {
            return true;
        }
        matches!((local_name, self.name.as_deref()), (Some(seen), Some(wanted)) if seen == wanted)
    }

    /// Check the properties btleplug collected for a peripheral.
    pub fn matches_properties(&self, properties: &PeripheralProperties) -> bool {
        let services = properties
            .services
            .iter()
            .chain(properties.service_data.keys());
        self.matches(properties.local_name.as_deref(), services)
    }
}

/// An advertiser seen during [`list_candidates`].
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Advertised local name.
    pub name: Option<String>,
    /// The peripheral ID for connecting.
    pub id: PeripheralId,
    /// MAC address on Linux/Windows, platform UUID on macOS.
    pub identifier: String,
    /// RSSI signal strength.
    pub rssi: Option<i16>,
    /// Whether the advertisement matches the band.
    pub is_band: bool,
}

/// Get the first available Bluetooth adapter.
pub async fn get_adapter() -> Result<Adapter> {
    let manager = Manager::new().await?;
    let adapters = manager.adapters().await?;

    adapters
        .into_iter()
        .next()
        .ok_or(Error::DeviceNotFound(DeviceNotFoundReason::NoAdapter))
}

/// Identifier used in logs and output for a peripheral.
///
/// CoreBluetooth hides MAC addresses and reports `00:00:00:00:00:00`;
/// there the peripheral ID (a UUID) is used instead.
pub fn peer_identifier(address: BDAddr, id: &PeripheralId) -> String {
    let address = address.to_string();
    if address == "00:00:00:00:00:00" {
        format!("{:?}", id)
            .trim_start_matches("PeripheralId(")
            .trim_end_matches(')')
            .to_string()
    } else {
        address
    }
}

/// Scan once for the band on the first adapter.
///
/// Returns the matching peripheral, or [`Error::DeviceNotFound`] when the
/// scan ends without a match.
pub async fn scan_for_band(matcher: &BandMatcher, options: &ScanOptions) -> Result<Peripheral> {
    let adapter = get_adapter().await?;
    find_band_with_adapter(&adapter, matcher, options)
        .await?
        .ok_or_else(|| Error::scan_timeout(options.duration))
}

/// Scan on `adapter` until `matcher` accepts an advertisement or the
/// duration elapses. Scanning is always stopped before returning.
pub async fn find_band_with_adapter(
    adapter: &Adapter,
    matcher: &BandMatcher,
    options: &ScanOptions,
) -> Result<Option<Peripheral>> {
    info!(
        "Scanning for band ({} ms, name={:?}, service={})",
        options.duration.as_millis(),
        matcher.name,
        matcher.service
    );

    // Subscribe before starting so early advertisements are not lost
    let mut events = adapter.events().await?;
    adapter.start_scan(ScanFilter::default()).await?;

    let found = match timeout(options.duration, next_match(adapter, &mut events, matcher)).await {
        Ok(result) => result,
        Err(_) => Ok(None),
    };

    if let Err(e) = adapter.stop_scan().await {
        warn!("Failed to stop scan: {}", e);
    }

    match &found {
        Ok(Some(peripheral)) => info!("Band found: {:?}", peripheral.id()),
        Ok(None) => info!("No band advertised within {:?}", options.duration),
        Err(e) => warn!("Scan failed: {}", e),
    }
    found
}

/// Consume central events until one belongs to a matching peripheral.
async fn next_match(
    adapter: &Adapter,
    events: &mut Pin<Box<dyn Stream<Item = CentralEvent> + Send>>,
    matcher: &BandMatcher,
) -> Result<Option<Peripheral>> {
    while let Some(event) = events.next().await {
        let id = match event {
            CentralEvent::DeviceDiscovered(id)
            | CentralEvent::DeviceUpdated(id)
            | CentralEvent::ServicesAdvertisement { id, .. }
            | CentralEvent::ServiceDataAdvertisement { id, .. } => id,
            _ => continue,
        };

        let peripheral = match adapter.peripheral(&id).await {
            Ok(p) => p,
            Err(e) => {
                debug!("Peripheral {:?} vanished: {}", id, e);
                continue;
            }
        };

        if let Ok(Some(properties)) = peripheral.properties().await
            && matcher.matches_properties(&properties)
        {
            debug!(
                "Matched {:?} (name={:?})",
                id, properties.local_name
            );
            return Ok(Some(peripheral));
        }
    }
    Ok(None)
}

/// Listen for the full duration and report every advertiser seen.
///
/// Unlike [`find_band_with_adapter`] this does not stop at the first match;
/// it is meant for diagnostics.
pub async fn list_candidates(
    matcher: &BandMatcher,
    options: &ScanOptions,
) -> Result<Vec<Candidate>> {
    let adapter = get_adapter().await?;
    info!(
        "Listing advertisers for {} ms...",
        options.duration.as_millis()
    );

    adapter.start_scan(ScanFilter::default()).await?;
    sleep(options.duration).await;
    adapter.stop_scan().await?;

    let mut candidates = Vec::new();
    for peripheral in adapter.peripherals().await? {
        let properties = match peripheral.properties().await {
            Ok(Some(p)) => p,
            Ok(None) => continue,
            Err(e) => {
                debug!("Error reading peripheral properties: {}", e);
                continue;
            }
        };
        let id = peripheral.id();
        candidates.push(Candidate {
            identifier: peer_identifier(properties.address, &id),
            is_band: matcher.matches_properties(&properties),
            name: properties.local_name,
            rssi: properties.rssi,
            id,
        });
    }

    // Matches first, then strongest signal
    candidates.sort_by(|a, b| {
        b.is_band
            .cmp(&a.is_band)
            .then_with(|| b.rssi.unwrap_or(i16::MIN).cmp(&a.rssi.unwrap_or(i16::MIN)))
    });

    info!("Scan complete. Saw {} advertiser(s)", candidates.len());
    Ok(candidates)
}
