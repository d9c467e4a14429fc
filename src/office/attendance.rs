use crate::office::office_location::OfficeLocation;
use crate::office::registry::OfficeRegistry;
use tracing::debug;

/// Coordinates recorded when checking in or out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttendancePoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Where an attendance was checked in and out, and the offices those points fall in.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Attendance {
    check_in: Option<AttendancePoint>,
    check_out: Option<AttendancePoint>,
    check_in_office_id: Option<u32>,
    check_out_office_id: Option<u32>,
}

impl Attendance {
    pub fn check_in<'r>(&mut self, registry: &'r OfficeRegistry, latitude: f64, longitude: f64) -> Option<&'r OfficeLocation> {
        self.check_in = Some(AttendancePoint { latitude, longitude });
        let office = registry.resolve(latitude, longitude);
        self.check_in_office_id = office.map(OfficeLocation::id);
        debug!(office = office.map(OfficeLocation::name), "🕘 Checked in at {}, {}", latitude, longitude);
        office
    }

    pub fn check_out<'r>(&mut self, registry: &'r OfficeRegistry, latitude: f64, longitude: f64) -> Option<&'r OfficeLocation> {
        self.check_out = Some(AttendancePoint { latitude, longitude });
        let office = registry.resolve(latitude, longitude);
        self.check_out_office_id = office.map(OfficeLocation::id);
        debug!(office = office.map(OfficeLocation::name), "🕔 Checked out at {}, {}", latitude, longitude);
        office
    }

    pub fn check_in_point(&self) -> Option<AttendancePoint> {
        self.check_in
    }

    pub fn check_out_point(&self) -> Option<AttendancePoint> {
        self.check_out
    }

    pub fn check_in_office_id(&self) -> Option<u32> {
        self.check_in_office_id
    }

    pub fn check_out_office_id(&self) -> Option<u32> {
        self.check_out_office_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::office::geometry::Srid;
    use pretty_assertions::assert_eq;

    fn registry() -> OfficeRegistry {
        OfficeRegistry::new(
            vec![
                OfficeLocation::new(1, "Square", Some("POLYGON((0 0, 0.001 0, 0.001 0.001, 0 0.001, 0 0))"), Srid::Wgs84).unwrap(),
                OfficeLocation::new(2, "Far", Some("POLYGON((1 1, 1.001 1, 1.001 1.001, 1 1.001, 1 1))"), Srid::Wgs84).unwrap(),
            ],
            5.0,
        )
    }

    #[test]
    fn assigns_offices_on_check_in_and_out() {
        let registry = registry();
        let mut attendance = Attendance::default();

        let office = attendance.check_in(&registry, 0.0005, 0.0005).map(OfficeLocation::name);
        assert_eq!(office, Some("Square"));
        attendance.check_out(&registry, 1.0005, 1.0005);

        assert_eq!(attendance.check_in_office_id(), Some(1));
        assert_eq!(attendance.check_out_office_id(), Some(2));
        assert_eq!(
            attendance.check_out_point(),
            Some(AttendancePoint {
                latitude: 1.0005,
                longitude: 1.0005
            })
        );
    }

    #[test]
    fn clears_the_office_when_checking_in_again_elsewhere() {
        let registry = registry();
        let mut attendance = Attendance::default();

        attendance.check_in(&registry, 0.0005, 0.0005);
        attendance.check_in(&registry, 5.0, 5.0);

        assert_eq!(attendance.check_in_office_id(), None);
        assert_eq!(attendance.check_in_point().map(|point| point.latitude), Some(5.0));
        assert_eq!(attendance.check_out_point(), None);
    }

    #[test]
    fn non_finite_coordinates_resolve_to_no_office() {
        let registry = registry();
        let mut attendance = Attendance::default();

        assert!(attendance.check_in(&registry, f64::NAN, 0.0005).is_none());
        assert_eq!(attendance.check_in_office_id(), None);
    }
}
