use crate::app_config::CacheConfig;
use crate::cache::fix_cache::{CachePolicy, FixCache};
use crate::clock::Clock;
use crate::domain::{Position, PositionError, PositionOptions};
use crate::geolocation::PositionProvider;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::runtime::Handle;
use tokio::sync::RwLock;
use tokio::task;
use tracing::{debug, info, instrument, warn};

/// Wraps a real position provider, serving a recent cached fix when one can be trusted and
/// delegating to the provider otherwise. Implements [`PositionProvider`] itself so it can stand in
/// for the provider it wraps.
#[derive(Debug)]
pub struct PositionCache {
    provider: Arc<dyn PositionProvider>,
    fixes: Arc<RwLock<FixCache>>,
    enabled: AtomicBool,
    background_refresh: bool,
    clock: Arc<dyn Clock>,
}

impl PositionCache {
    pub fn new(provider: Arc<dyn PositionProvider>, policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        PositionCache {
            provider,
            fixes: Arc::new(RwLock::new(FixCache::new(policy))),
            enabled: AtomicBool::new(true),
            background_refresh: true,
            clock,
        }
    }

    pub fn from_config(provider: Arc<dyn PositionProvider>, config: &CacheConfig, clock: Arc<dyn Clock>) -> Self {
        Self::new(provider, config.policy(), clock)
            .with_enabled(config.enabled())
            .with_background_refresh(config.background_refresh())
    }

    /// Wraps `provider` when there is one. Without a provider nothing is intercepted and callers
    /// keep dealing with the missing capability themselves.
    pub fn install(provider: Option<Arc<dyn PositionProvider>>, config: &CacheConfig, clock: Arc<dyn Clock>) -> Option<Arc<PositionCache>> {
        let Some(provider) = provider else {
            warn!("⚠️ No geolocation provider available, position cache not installed");
            return None;
        };

        let cache = Self::from_config(provider, config, clock);
        info!(enabled = cache.is_enabled(), "📍 Position cache active");
        Some(Arc::new(cache))
    }

    pub fn with_enabled(self, enabled: bool) -> Self {
        self.enabled.store(enabled, Ordering::SeqCst);
        self
    }

    pub fn with_background_refresh(mut self, background_refresh: bool) -> Self {
        self.background_refresh = background_refresh;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Turns serving from the cache on or off. Fixes from the provider are recorded either way.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
        info!("📍 Position cache {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Seeds the cache with a fix obtained elsewhere, without contacting the provider.
    pub async fn prime_cache(&self, latitude: f64, longitude: f64, accuracy: Option<f64>) {
        let now = self.clock.now();
        self.fixes.write().await.prime(latitude, longitude, accuracy, now);
        debug!(latitude, longitude, ?accuracy, "📍 Cache primed manually");
    }

    async fn cached_position(&self) -> Option<Position> {
        let now = self.clock.now();
        let fixes = self.fixes.read().await;
        match fixes.validate(now) {
            Ok(fix) => {
                debug!(latitude = fix.coords.latitude, longitude = fix.coords.longitude, "📍 Using cached position");
                Some(fix.to_position(now))
            }
            Err(miss) => {
                debug!("📍 Not using cached position: {}", miss);
                None
            }
        }
    }

    async fn fetch_live(&self, options: &PositionOptions) -> Result<Position, PositionError> {
        let result = fetch_and_record(self.provider.as_ref(), &self.fixes, self.clock.as_ref(), options).await;
        if let Err(err) = &result {
            warn!(code = err.code(), "⚠️ Geolocation provider failed: {}", err);
        }
        result
    }

    /// Refreshes the cache on a task of the current tokio runtime. Without a runtime there is
    /// nothing to run the refresh on and it is skipped.
    fn spawn_refresh(&self, options: PositionOptions) {
        let Ok(runtime) = Handle::try_current() else {
            debug!("📍 No tokio runtime, skipping background refresh");
            return;
        };

        let provider = self.provider.clone();
        let fixes = self.fixes.clone();
        let clock = self.clock.clone();
        runtime.spawn(async move {
            if let Err(err) = fetch_and_record(provider.as_ref(), &fixes, clock.as_ref(), &options).await {
                debug!("📍 Background refresh failed: {}", err);
            }
        });
    }
}

async fn fetch_and_record(
    provider: &dyn PositionProvider,
    fixes: &RwLock<FixCache>,
    clock: &dyn Clock,
    options: &PositionOptions,
) -> Result<Position, PositionError> {
    let position = provider.current_position(options).await?;
    fixes.write().await.record_live(&position.coords, clock.now());
    Ok(position)
}

#[async_trait]
impl PositionProvider for PositionCache {
    #[instrument(skip_all)]
    async fn current_position(&self, options: &PositionOptions) -> Result<Position, PositionError> {
        if self.is_enabled() {
            if let Some(position) = self.cached_position().await {
                if self.background_refresh {
                    self.spawn_refresh(options.clone());
                }
                // A hit is never resolved without giving the scheduler a turn first.
                task::yield_now().await;
                return Ok(position);
            }
        }

        self.fetch_live(options).await
    }
}
