use chrono::{DateTime, Utc};
use std::time::Duration;

/// The coordinates of a single geolocation reading. Everything but latitude and longitude is
/// optional metadata reported by the provider.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub accuracy: Option<f64>, // In meters
    pub altitude: Option<f64>, // In meters
    pub altitude_accuracy: Option<f64>,
    pub heading: Option<f64>, // In degrees, clockwise from true north
    pub speed: Option<f64>,   // In meters per second
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Coordinates {
            latitude,
            longitude,
            ..Default::default()
        }
    }

    pub fn with_accuracy(mut self, accuracy: Option<f64>) -> Self {
        self.accuracy = accuracy;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub coords: Coordinates,
    pub timestamp: DateTime<Utc>,
}

impl Position {
    pub fn new(coords: Coordinates, timestamp: DateTime<Utc>) -> Self {
        Position { coords, timestamp }
    }
}

/// Options handed to a position provider. The cache never interprets them, it only passes them on.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionOptions {
    pub enable_high_accuracy: bool,
    pub timeout: Option<Duration>,
    pub maximum_age: Option<Duration>,
}
