use crate::app_config::Device;
use crate::clock::Clock;
use crate::domain::{Coordinates, Position, PositionError, PositionOptions};
use crate::geolocation::PositionProvider;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, instrument};

/// A device with a fixed, configured location that takes a while to produce a fix, like a
/// receiver waiting for satellites.
#[derive(Debug)]
pub struct DevicePositionProvider {
    coords: Coordinates,
    latency: Duration,
    clock: Arc<dyn Clock>,
}

impl DevicePositionProvider {
    pub fn new(device: &Device, clock: Arc<dyn Clock>) -> Self {
        let location = device.location();
        DevicePositionProvider {
            coords: Coordinates {
                latitude: location.latitude,
                longitude: location.longitude,
                accuracy: device.accuracy_m(),
                altitude: Some(location.altitude),
                ..Default::default()
            },
            latency: device.latency(),
            clock,
        }
    }
}

#[async_trait]
impl PositionProvider for DevicePositionProvider {
    #[instrument(skip_all)]
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, PositionError> {
        debug!("📡 Acquiring device fix...");
        match options.timeout {
            Some(timeout) if timeout < self.latency => {
                sleep(timeout).await;
                debug!("📡 Acquiring device fix... timed out after {:?}", timeout);
                Err(PositionError::Timeout)
            }
            _ => {
                sleep(self.latency).await;
                debug!("📡 Acquiring device fix... OK");
                Ok(Position::new(self.coords.clone(), self.clock.now()))
            }
        }
    }
}
