use crate::domain::GeoLocation;
use serde::de::Error;
use serde::{Deserialize, Deserializer};

impl<'de> Deserialize<'de> for GeoLocation {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        pub struct Inner {
            latitude: f64,
            longitude: f64,
            #[serde(default)]
            altitude_m: f64,
        }

        let inner = Inner::deserialize(deserializer)?;
        validate_coordinates(inner.latitude, inner.longitude).map_err(Error::custom)?;

        Ok(GeoLocation {
            latitude: inner.latitude,
            longitude: inner.longitude,
            altitude: inner.altitude_m,
        })
    }
}

/// Checks that a latitude/longitude pair lies within the WGS84 range.
pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), String> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(format!("invalid location latitude: {}, must be between -90 and 90", latitude));
    }

    if !(-180.0..=180.0).contains(&longitude) {
        return Err(format!("invalid location longitude: {}, must be between -180 and 180", longitude));
    }

    Ok(())
}
