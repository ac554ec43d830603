//! btleplug-backed transport.
//!
//! Talks to the band through the host's Bluetooth stack (BlueZ on Linux,
//! CoreBluetooth on macOS, WinRT on Windows).

use std::time::Duration;

use async_trait::async_trait;
use btleplug::api::{CharPropFlags, Characteristic, Peripheral as _, WriteType};
use btleplug::platform::{Adapter, Peripheral};
use tokio::time::timeout;
use tracing::{debug, info};

use guardian_types::COMMAND_LEN;

use crate::error::{ConnectionFailureReason, Error, Result};
use crate::scan::{BandMatcher, ScanOptions, find_band_with_adapter, get_adapter, peer_identifier};
use crate::traits::{BandTransport, GattTarget};

/// [`BandTransport`] over a real Bluetooth adapter.
pub struct BtleTransport {
    adapter: Adapter,
}

impl std::fmt::Debug for BtleTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BtleTransport").finish_non_exhaustive()
    }
}

impl BtleTransport {
    /// Use the first Bluetooth adapter on this host.
    pub async fn new() -> Result<Self> {
        Ok(Self {
            adapter: get_adapter().await?,
        })
    }

    /// Use a specific adapter.
    pub fn with_adapter(adapter: Adapter) -> Self {
        Self { adapter }
    }

    /// The adapter this transport scans and connects with.
    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }
}

/// Find `target` among the peripheral's discovered services.
fn find_characteristic(peripheral: &Peripheral, target: &GattTarget) -> Result<Characteristic> {
    let services = peripheral.services();
    let service = services
        .iter()
        .find(|s| s.uuid == target.service)
        .ok_or_else(|| Error::service_not_found(target.service.to_string()))?;

    service
        .characteristics
        .iter()
        .find(|c| c.uuid == target.characteristic)
        .cloned()
        .ok_or_else(|| {
            Error::characteristic_not_found(target.characteristic.to_string(), services.len())
        })
}

/// Map a btleplug connect error onto a structured connection failure.
fn connect_failure(device_id: String, err: btleplug::Error) -> Error {
    let reason = match err {
        btleplug::Error::TimedOut(_) => ConnectionFailureReason::Timeout,
        btleplug::Error::DeviceNotFound => ConnectionFailureReason::OutOfRange,
        other => ConnectionFailureReason::BleError(other.to_string()),
    };
    Error::connection_failed(Some(device_id), reason)
}

#[async_trait]
impl BandTransport for BtleTransport {
    type Peer = Peripheral;

    async fn scan(
        &self,
        matcher: &BandMatcher,
        options: &ScanOptions,
    ) -> Result<Option<Self::Peer>> {
        find_band_with_adapter(&self.adapter, matcher, options).await
    }

    async fn connect(&self, peer: &Self::Peer, connect_timeout: Duration) -> Result<()> {
        let label = self.peer_label(peer);
        info!("Connecting to {}...", label);
        match timeout(connect_timeout, peer.connect()).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(connect_failure(label, e)),
            Err(_) => {
                return Err(Error::connection_failed(
                    Some(label),
                    ConnectionFailureReason::Timeout,
                ));
            }
        }
        info!("Connected");
        Ok(())
    }

    async fn write_command(
        &self,
        peer: &Self::Peer,
        target: &GattTarget,
        payload: &[u8; COMMAND_LEN],
        op_timeout: Duration,
    ) -> Result<()> {
        timeout(op_timeout, peer.discover_services())
            .await
            .map_err(|_| Error::timeout("discover services", op_timeout))??;

        for service in peer.services() {
            debug!(
                "  Service: {} ({} characteristics)",
                service.uuid,
                service.characteristics.len()
            );
        }

        let characteristic = find_characteristic(peer, target)?;
        if !characteristic
            .properties
            .contains(CharPropFlags::WRITE_WITHOUT_RESPONSE)
        {
            return Err(Error::write_not_supported(target.characteristic.to_string()));
        }

        timeout(
            op_timeout,
            peer.write(&characteristic, payload, WriteType::WithoutResponse),
        )
        .await
        .map_err(|_| Error::timeout("write command", op_timeout))?
        .map_err(|e| Error::write_failed(target.characteristic.to_string(), e.to_string()))?;

        debug!("Wrote {:02X?} to {}", payload, target.characteristic);
        Ok(())
    }

    async fn disconnect(&self, peer: &Self::Peer) -> Result<()> {
        peer.disconnect().await?;
        Ok(())
    }

    fn peer_label(&self, peer: &Self::Peer) -> String {
        peer_identifier(peer.address(), &peer.id())
    }
}
