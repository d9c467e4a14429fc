use crate::domain::{Coordinates, Position, haversine_m};
use crate::extensions::date_time_ext::Age;
use chrono::{DateTime, Utc};
use std::time::Duration;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq)]
pub struct CachePolicy {
    /// Oldest cached fix that may still be served.
    pub max_age: Duration,
    /// Largest distance in meters between the cached fix and a recent live fix.
    pub max_distance_m: f64,
    /// Live fixes older than this no longer take part in the distance check.
    pub live_fix_window: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        CachePolicy {
            max_age: Duration::from_secs(15),
            max_distance_m: 50.0,
            live_fix_window: Duration::from_secs(5 * 60),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CachedFix {
    pub coords: Coordinates,
    pub captured_at: DateTime<Utc>,
}

impl CachedFix {
    /// Builds the position handed out on a cache hit, stamped with the time it is served.
    pub fn to_position(&self, now: DateTime<Utc>) -> Position {
        Position::new(self.coords.clone(), now)
    }
}

/// The most recent fix obtained from the real provider.
#[derive(Clone, Debug, PartialEq)]
pub struct LastLiveFix {
    pub latitude: f64,
    pub longitude: f64,
    pub captured_at: DateTime<Utc>,
}

#[derive(Error, Debug, PartialEq)]
pub enum CacheMiss {
    #[error("nothing cached")]
    Empty,
    #[error("cached fix has non-finite coordinates")]
    Malformed,
    #[error("cached fix is {0:?} old")]
    Stale(Duration),
    #[error("cached fix is {0:.1}m away from the last live fix")]
    TooFar(f64),
}

/// Holds at most one cached fix and one live fix, and decides whether the cached one may be served.
#[derive(Debug, Default)]
pub struct FixCache {
    policy: CachePolicy,
    cached: Option<CachedFix>,
    last_live: Option<LastLiveFix>,
}

impl FixCache {
    pub fn new(policy: CachePolicy) -> Self {
        FixCache {
            policy,
            cached: None,
            last_live: None,
        }
    }

    pub fn policy(&self) -> &CachePolicy {
        &self.policy
    }

    pub fn cached(&self) -> Option<&CachedFix> {
        self.cached.as_ref()
    }

    pub fn last_live(&self) -> Option<&LastLiveFix> {
        self.last_live.as_ref()
    }

    /// Returns the cached fix if it is young enough and, when a recent live fix exists, close
    /// enough to it.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<&CachedFix, CacheMiss> {
        let cached = self.cached.as_ref().ok_or(CacheMiss::Empty)?;
        if !cached.coords.latitude.is_finite() || !cached.coords.longitude.is_finite() {
            return Err(CacheMiss::Malformed);
        }

        let age = cached.captured_at.age_at(&now);
        if age > self.policy.max_age {
            return Err(CacheMiss::Stale(age));
        }

        if let Some(live) = &self.last_live {
            // A live fix stamped in the future still counts as recent.
            let live_age = now.signed_duration_since(live.captured_at).to_std().unwrap_or(Duration::ZERO);
            if live_age < self.policy.live_fix_window {
                let distance = haversine_m(cached.coords.latitude, cached.coords.longitude, live.latitude, live.longitude);
                if !distance.is_finite() || distance > self.policy.max_distance_m {
                    return Err(CacheMiss::TooFar(distance));
                }
            }
        }

        Ok(cached)
    }

    pub fn lookup(&self, now: DateTime<Utc>) -> Option<&CachedFix> {
        self.validate(now).ok()
    }

    /// Stores a fix from the real provider as both the cached fix and the last live fix.
    pub fn record_live(&mut self, coords: &Coordinates, now: DateTime<Utc>) {
        self.cached = Some(CachedFix {
            coords: coords.clone(),
            captured_at: now,
        });
        self.last_live = Some(LastLiveFix {
            latitude: coords.latitude,
            longitude: coords.longitude,
            captured_at: now,
        });
    }

    /// Seeds the cache with a fix obtained elsewhere. The last live fix is left untouched.
    pub fn prime(&mut self, latitude: f64, longitude: f64, accuracy: Option<f64>, now: DateTime<Utc>) {
        self.cached = Some(CachedFix {
            coords: Coordinates::new(latitude, longitude).with_accuracy(accuracy),
            captured_at: now,
        });
    }
}
