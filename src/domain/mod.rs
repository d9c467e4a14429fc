mod geo_location;
mod position;
mod position_error;

pub use geo_location::{EARTH_RADIUS_M, GeoLocation, haversine_m};
pub use position::{Coordinates, Position, PositionOptions};
pub use position_error::PositionError;
