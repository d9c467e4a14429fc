use crate::domain::GeoLocation;
use crate::office::geometry::{OfficeGeometry, Srid, WktError};
use geo::Point;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, PartialEq)]
pub struct OfficeLocation {
    id: u32,
    name: String,
    srid: Srid,
    geometry: Option<OfficeGeometry>,
}

impl OfficeLocation {
    /// Creates an office, parsing `wkt` in the given spatial reference. Blank WKT means the office
    /// has no geometry yet.
    pub fn new(id: u32, name: impl Into<String>, wkt: Option<&str>, srid: Srid) -> Result<Self, WktError> {
        let geometry = match wkt.map(str::trim).filter(|wkt| !wkt.is_empty()) {
            Some(wkt) => Some(OfficeGeometry::from_wkt(wkt, srid)?),
            None => None,
        };

        Ok(OfficeLocation {
            id,
            name: name.into(),
            srid,
            geometry,
        })
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn srid(&self) -> Srid {
        self.srid
    }

    pub fn geometry(&self) -> Option<&OfficeGeometry> {
        self.geometry.as_ref()
    }

    pub fn has_valid_geometry(&self) -> bool {
        self.geometry.as_ref().is_some_and(OfficeGeometry::is_valid)
    }

    pub fn area_m2(&self) -> f64 {
        self.geometry.as_ref().filter(|geometry| geometry.is_valid()).map_or(0.0, OfficeGeometry::area_m2)
    }

    pub fn centroid(&self) -> Option<GeoLocation> {
        self.geometry.as_ref().and_then(OfficeGeometry::centroid)
    }

    /// True when the point lies in the office or within `tolerance_m` of its boundary.
    pub fn matches(&self, point: Point, tolerance_m: f64) -> bool {
        match &self.geometry {
            Some(geometry) if geometry.is_valid() => geometry.distance_m(point) <= tolerance_m,
            _ => false,
        }
    }
}

impl<'de> Deserialize<'de> for OfficeLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        pub struct Inner {
            id: u32,
            name: String,
            wkt: Option<String>,
            #[serde(default)]
            srid: Srid,
        }

        let inner = Inner::deserialize(deserializer)?;
        if inner.name.trim().is_empty() {
            return Err(Error::custom(format!("office {} has no name", inner.id)));
        }

        OfficeLocation::new(inner.id, inner.name, inner.wkt.as_deref(), inner.srid)
            .map_err(|e| Error::custom(format!("invalid polygon for office {}: {}", inner.id, e)))
    }
}
