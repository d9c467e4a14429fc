mod attendance;
mod geometry;
mod label;
mod lookup;
mod office_location;
mod registry;

pub use attendance::{Attendance, AttendancePoint};
pub use geometry::{OfficeGeometry, Srid, WktError, from_web_mercator, to_web_mercator};
pub use label::{OfficeLabel, OfficeLabeler};
pub use lookup::{DEFAULT_REMOTE_TIMEOUT, OfficeLookup, OfficeLookupError, OfficeName, RemoteOfficeLookup, UNKNOWN_OFFICE};
pub use office_location::OfficeLocation;
pub use registry::{DEFAULT_BOUNDARY_TOLERANCE_M, OUTSIDE_OFFICE, OfficeRegistry};
