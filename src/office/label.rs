use crate::cache::PositionCache;
use crate::domain::PositionOptions;
use crate::geolocation::PositionProvider;
use crate::office::lookup::{OfficeLookup, UNKNOWN_OFFICE};
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

/// What the attendance screen shows next to the check in/out button.
#[derive(Clone, Debug, PartialEq)]
pub struct OfficeLabel {
    pub office: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl OfficeLabel {
    fn new(office: &str, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        let office = office.trim();
        OfficeLabel {
            office: if office.is_empty() { UNKNOWN_OFFICE } else { office }.to_string(),
            latitude,
            longitude,
        }
    }
}

impl Display for OfficeLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let coordinate = |value: Option<f64>| value.map_or_else(|| UNKNOWN_OFFICE.to_string(), |v| v.to_string());
        write!(
            f,
            "GEO-access: {} | Geolocation: {} , {}",
            self.office,
            coordinate(self.latitude),
            coordinate(self.longitude)
        )
    }
}

/// Combines the position cache with an office lookup to produce [`OfficeLabel`]s.
#[derive(Debug)]
pub struct OfficeLabeler {
    positions: Arc<PositionCache>,
    lookup: Arc<dyn OfficeLookup>,
    options: PositionOptions,
    last_coordinates: RwLock<Option<(f64, f64)>>,
    busy: AtomicBool,
}

impl OfficeLabeler {
    pub fn new(positions: Arc<PositionCache>, lookup: Arc<dyn OfficeLookup>, options: PositionOptions) -> Self {
        OfficeLabeler {
            positions,
            lookup,
            options,
            last_coordinates: RwLock::new(None),
            busy: AtomicBool::new(false),
        }
    }

    /// Acquires the current position and labels it. Returns `None` when another refresh is still
    /// running.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> Option<OfficeLabel> {
        let Some(_busy) = BusyGuard::acquire(&self.busy) else {
            return None;
        };

        let label = match self.positions.current_position(&self.options).await {
            Ok(position) => self.lookup_label(position.coords.latitude, position.coords.longitude).await,
            Err(err) => {
                warn!("⚠️ No position for the office label: {}", err);
                let last = *self.last_coordinates.read().await;
                OfficeLabel::new(UNKNOWN_OFFICE, last.map(|(lat, _)| lat), last.map(|(_, lon)| lon))
            }
        };

        self.remember(&label).await;
        debug!("🏷️ {}", label);
        Some(label)
    }

    /// Labels a fix that was acquired elsewhere and primes the position cache with it.
    #[instrument(skip(self))]
    pub async fn label_at(&self, latitude: f64, longitude: f64, accuracy: Option<f64>) -> OfficeLabel {
        self.positions.prime_cache(latitude, longitude, accuracy).await;
        let label = self.lookup_label(latitude, longitude).await;
        self.remember(&label).await;
        label
    }

    async fn lookup_label(&self, latitude: f64, longitude: f64) -> OfficeLabel {
        match self.lookup.office_name(latitude, longitude).await {
            Ok(name) => OfficeLabel::new(&name.location, Some(name.latitude), Some(name.longitude)),
            Err(err) => {
                warn!("⚠️ Office lookup failed: {}", err);
                OfficeLabel::new(UNKNOWN_OFFICE, Some(latitude), Some(longitude))
            }
        }
    }

    async fn remember(&self, label: &OfficeLabel) {
        if let (Some(latitude), Some(longitude)) = (label.latitude, label.longitude) {
            *self.last_coordinates.write().await = Some((latitude, longitude));
        }
    }
}

/// Holds the busy flag for the duration of a refresh, also when the refresh is dropped halfway.
struct BusyGuard<'a>(&'a AtomicBool);

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            None
        } else {
            Some(BusyGuard(flag))
        }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
