use crate::office::geometry::to_web_mercator;
use crate::office::lookup::OfficeName;
use crate::office::office_location::OfficeLocation;
use tracing::{debug, info};

/// Label used for coordinates that do not fall within any office.
pub const OUTSIDE_OFFICE: &str = "Outside Office";

/// Default distance in meters a point may lie outside an office polygon and still count as inside.
pub const DEFAULT_BOUNDARY_TOLERANCE_M: f64 = 5.0;

#[derive(Clone, Debug)]
pub struct OfficeRegistry {
    offices: Vec<OfficeLocation>,
    boundary_tolerance_m: f64,
}

impl OfficeRegistry {
    pub fn new(mut offices: Vec<OfficeLocation>, boundary_tolerance_m: f64) -> Self {
        offices.sort_by_key(OfficeLocation::id);

        let valid = offices.iter().filter(|office| office.has_valid_geometry()).count();
        info!("🏢 Registered {} office(s), {} with a valid polygon", offices.len(), valid);

        OfficeRegistry {
            offices,
            boundary_tolerance_m,
        }
    }

    pub fn offices(&self) -> &[OfficeLocation] {
        &self.offices
    }

    pub fn by_id(&self, id: u32) -> Option<&OfficeLocation> {
        self.offices.iter().find(|office| office.id() == id)
    }

    /// Finds the office with the lowest id that contains the coordinates, allowing for the boundary
    /// tolerance.
    pub fn resolve(&self, latitude: f64, longitude: f64) -> Option<&OfficeLocation> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return None;
        }

        let point = to_web_mercator(latitude, longitude);
        let office = self.offices.iter().find(|office| office.matches(point, self.boundary_tolerance_m));
        debug!(latitude, longitude, office = office.map(OfficeLocation::name), "🏢 Resolved office");
        office
    }

    pub fn office_name(&self, latitude: f64, longitude: f64) -> OfficeName {
        let location = self.resolve(latitude, longitude).map_or(OUTSIDE_OFFICE, OfficeLocation::name);
        OfficeName {
            location: location.to_string(),
            latitude,
            longitude,
        }
    }
}
