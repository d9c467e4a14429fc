use crate::cache::CachePolicy;
use crate::domain::GeoLocation;
use crate::office::{DEFAULT_BOUNDARY_TOLERANCE_M, DEFAULT_REMOTE_TIMEOUT, OfficeLocation};
use config::{Config, ConfigError};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    core: Core,
    #[serde(default)]
    cache: CacheConfig,
    device: Option<Device>,
    #[serde(default)]
    office: OfficeConfig,
    #[serde(default)]
    offices: Vec<OfficeLocation>,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(config::File::with_name("config").required(true))
            .add_source(config::File::with_name("config_local").required(false))
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn core(&self) -> &Core {
        &self.core
    }

    pub fn cache(&self) -> &CacheConfig {
        &self.cache
    }

    pub fn device(&self) -> Option<&Device> {
        self.device.as_ref()
    }

    pub fn office(&self) -> &OfficeConfig {
        &self.office
    }

    pub fn offices(&self) -> &[OfficeLocation] {
        &self.offices
    }
}

#[derive(Debug, Deserialize)]
pub struct Core {
    log_level: String,
}

impl Default for Core {
    fn default() -> Self {
        Core {
            log_level: "info".to_string(),
        }
    }
}

impl Core {
    pub fn log_level(&self) -> &str {
        &self.log_level
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    enabled: bool,
    #[serde(with = "humantime_serde")]
    max_age: Duration,
    max_distance_m: f64,
    #[serde(with = "humantime_serde")]
    live_fix_window: Duration,
    background_refresh: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        let policy = CachePolicy::default();
        CacheConfig {
            enabled: true,
            max_age: policy.max_age,
            max_distance_m: policy.max_distance_m,
            live_fix_window: policy.live_fix_window,
            background_refresh: true,
        }
    }
}

impl CacheConfig {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn background_refresh(&self) -> bool {
        self.background_refresh
    }

    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            max_age: self.max_age,
            max_distance_m: self.max_distance_m,
            live_fix_window: self.live_fix_window,
        }
    }
}

/// A positioning device with a fixed location.
#[derive(Debug, Deserialize)]
pub struct Device {
    location: GeoLocation,
    accuracy_m: Option<f64>,
    #[serde(with = "humantime_serde", default)]
    latency: Duration,
}

impl Device {
    pub fn location(&self) -> &GeoLocation {
        &self.location
    }

    pub fn accuracy_m(&self) -> Option<f64> {
        self.accuracy_m
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    #[default]
    Local,
    Remote,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OfficeConfig {
    lookup: LookupKind,
    remote_url: Option<String>,
    #[serde(with = "humantime_serde")]
    remote_timeout: Duration,
    boundary_tolerance_m: f64,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        OfficeConfig {
            lookup: LookupKind::Local,
            remote_url: None,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            boundary_tolerance_m: DEFAULT_BOUNDARY_TOLERANCE_M,
        }
    }
}

impl OfficeConfig {
    pub fn lookup(&self) -> LookupKind {
        self.lookup
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    pub fn remote_timeout(&self) -> Duration {
        self.remote_timeout
    }

    pub fn boundary_tolerance_m(&self) -> f64 {
        self.boundary_tolerance_m
    }
}

#[cfg(test)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

#[cfg(test)]
impl AppConfigBuilder {
    pub fn new() -> Self {
        AppConfigBuilder {
            config: AppConfig {
                core: Core::default(),
                cache: CacheConfig::default(),
                device: Some(Device {
                    location: GeoLocation {
                        latitude: -6.2,
                        longitude: 106.816666,
                        altitude: 0.0,
                    },
                    accuracy_m: Some(5.0),
                    latency: Duration::from_millis(100),
                }),
                office: OfficeConfig::default(),
                offices: vec![],
            },
        }
    }

    pub fn cache_enabled(mut self, enabled: bool) -> Self {
        self.config.cache.enabled = enabled;
        self
    }

    pub fn device_latency(mut self, latency: Duration) -> Self {
        if let Some(device) = self.config.device.as_mut() {
            device.latency = latency;
        }
        self
    }

    pub fn remote_url(mut self, url: String) -> Self {
        self.config.office.lookup = LookupKind::Remote;
        self.config.office.remote_url = Some(url);
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}
