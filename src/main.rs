use attendance_geo::app_config::{AppConfig, LookupKind};
use attendance_geo::cache::PositionCache;
use attendance_geo::clock::{Clock, SystemClock};
use attendance_geo::domain::PositionOptions;
use attendance_geo::geolocation::{DevicePositionProvider, PositionProvider};
use attendance_geo::office::{OfficeLabeler, OfficeLookup, OfficeRegistry, RemoteOfficeLookup};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.core().log_level())))
        .init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    info!("✅  Loaded configuration");

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let registry = Arc::new(OfficeRegistry::new(config.offices().to_vec(), config.office().boundary_tolerance_m()));
    let lookup: Arc<dyn OfficeLookup> = match config.office().lookup() {
        LookupKind::Local => registry.clone(),
        LookupKind::Remote => Arc::new(RemoteOfficeLookup::new(config.office())?),
    };
    info!("✅  Initialized {:?} office lookup", config.office().lookup());

    let device = config
        .device()
        .map(|device| Arc::new(DevicePositionProvider::new(device, clock.clone())) as Arc<dyn PositionProvider>);
    let Some(positions) = PositionCache::install(device, config.cache(), clock) else {
        warn!("⚠️ Nothing to label without a geolocation provider");
        return Ok(());
    };
    info!("✅  Installed position cache");

    let labeler = OfficeLabeler::new(positions.clone(), lookup, PositionOptions::default());
    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    // The second refresh is answered from the cache.
    for _ in 0..2 {
        if let Some(label) = labeler.refresh().await {
            info!("📍 {}", label);
        }
    }

    Ok(())
}
