use crate::domain::GeoLocation;
use geo::algorithm::Validation;
#[allow(deprecated)]
use geo::{Area, Centroid, Coord, EuclideanDistance, Intersects, MapCoords, Point, Polygon};
use serde::Deserialize;
use std::f64::consts::FRAC_PI_4;
use thiserror::Error;
use wkt::TryFromWkt;

/// Sphere radius used by the Web Mercator projection (EPSG:3857).
const MERCATOR_RADIUS_M: f64 = 6_378_137.0;

/// Spatial reference the WKT coordinates of an office are expressed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
pub enum Srid {
    /// WGS84 longitude/latitude in degrees.
    #[default]
    #[serde(rename = "4326")]
    Wgs84,
    /// Web Mercator meters.
    #[serde(rename = "3857")]
    WebMercator,
}

#[derive(Error, Debug, PartialEq)]
#[error("invalid WKT polygon: {0}")]
pub struct WktError(String);

/// Projects WGS84 degrees to Web Mercator meters.
pub fn to_web_mercator(latitude: f64, longitude: f64) -> Point {
    Point::new(
        MERCATOR_RADIUS_M * longitude.to_radians(),
        MERCATOR_RADIUS_M * (FRAC_PI_4 + latitude.to_radians() / 2.0).tan().ln(),
    )
}

pub fn from_web_mercator(point: Point) -> GeoLocation {
    GeoLocation {
        latitude: (2.0 * (point.y() / MERCATOR_RADIUS_M).exp().atan() - 2.0 * FRAC_PI_4).to_degrees(),
        longitude: (point.x() / MERCATOR_RADIUS_M).to_degrees(),
        altitude: 0.0,
    }
}

/// Polygon of an office in Web Mercator, all distances and areas are planar in that projection.
#[derive(Clone, Debug, PartialEq)]
pub struct OfficeGeometry {
    polygon: Polygon,
}

impl OfficeGeometry {
    /// Parses `POLYGON((x y, ...), (hole...))`. Rings that are not closed get closed.
    pub fn from_wkt(wkt: &str, srid: Srid) -> Result<Self, WktError> {
        let polygon = Polygon::<f64>::try_from_wkt_str(&wkt.trim().to_ascii_uppercase()).map_err(|err| WktError(err.to_string()))?;
        let polygon = match srid {
            Srid::Wgs84 => polygon.map_coords(|Coord { x, y }| to_web_mercator(y, x).0),
            Srid::WebMercator => polygon,
        };
        Ok(OfficeGeometry { polygon })
    }

    pub fn is_valid(&self) -> bool {
        self.polygon.is_valid() && self.polygon.unsigned_area() > 0.0
    }

    /// Area in square Web Mercator meters, holes excluded.
    pub fn area_m2(&self) -> f64 {
        self.polygon.unsigned_area()
    }

    /// Centroid of the area, in WGS84.
    pub fn centroid(&self) -> Option<GeoLocation> {
        if !self.is_valid() {
            return None;
        }
        self.polygon.centroid().map(from_web_mercator)
    }

    /// True when the point lies inside the polygon or on its boundary.
    pub fn covers(&self, point: Point) -> bool {
        self.polygon.intersects(&point)
    }

    /// Planar distance to the polygon, zero when the point is covered.
    #[allow(deprecated)]
    pub fn distance_m(&self, point: Point) -> f64 {
        if self.covers(point) {
            return 0.0;
        }
        point.euclidean_distance(&self.polygon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const SQUARE_WITH_HOLE: &str = "POLYGON((0 0, 100 0, 100 100, 0 100, 0 0), (10 10, 20 10, 20 20, 10 20, 10 10))";

    fn square() -> OfficeGeometry {
        OfficeGeometry::from_wkt("POLYGON((0 0, 100 0, 100 100, 0 100, 0 0))", Srid::WebMercator).unwrap()
    }

    #[test]
    fn projects_to_web_mercator_and_back() {
        let point = to_web_mercator(-6.2, 106.816666);
        assert!((point.x() - 11_890_776.87).abs() < 0.01, "x was {}", point.x());

        let location = from_web_mercator(point);
        assert!((location.latitude + 6.2).abs() < 1e-9);
        assert!((location.longitude - 106.816666).abs() < 1e-9);
    }

    #[test]
    fn computes_the_area_without_holes() {
        let geometry = OfficeGeometry::from_wkt(SQUARE_WITH_HOLE, Srid::WebMercator).unwrap();
        assert_eq!(geometry.area_m2(), 9_900.0);
    }

    #[test]
    fn computes_the_centroid() {
        let centroid = square().centroid().unwrap();
        let expected = from_web_mercator(Point::new(50.0, 50.0));
        assert!((centroid.latitude - expected.latitude).abs() < 1e-12);
        assert!((centroid.longitude - expected.longitude).abs() < 1e-12);
    }

    #[rstest]
    #[case::inside(Point::new(50.0, 50.0), true)]
    #[case::on_an_edge(Point::new(100.0, 40.0), true)]
    #[case::on_a_vertex(Point::new(0.0, 0.0), true)]
    #[case::outside(Point::new(101.0, 40.0), false)]
    fn covers(#[case] point: Point, #[case] expected: bool) {
        assert_eq!(square().covers(point), expected);
    }

    #[test]
    fn does_not_cover_points_in_a_hole() {
        let geometry = OfficeGeometry::from_wkt(SQUARE_WITH_HOLE, Srid::WebMercator).unwrap();
        assert!(!geometry.covers(Point::new(15.0, 15.0)));
        assert!(geometry.covers(Point::new(10.0, 15.0)));
        assert!((geometry.distance_m(Point::new(15.0, 15.0)) - 5.0).abs() < 1e-9);
    }

    #[rstest]
    #[case::inside(Point::new(50.0, 50.0), 0.0)]
    #[case::beside(Point::new(104.0, 50.0), 4.0)]
    #[case::diagonal(Point::new(103.0, 104.0), 5.0)]
    fn distance(#[case] point: Point, #[case] expected: f64) {
        assert!((square().distance_m(point) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case::square("POLYGON((0 0, 100 0, 100 100, 0 100, 0 0))", true)]
    #[case::bow_tie("POLYGON((0 0, 100 100, 100 0, 0 100, 0 0))", false)]
    #[case::too_few_points("POLYGON((0 0, 100 0, 0 0))", false)]
    #[case::no_area("POLYGON((0 0, 50 0, 100 0, 0 0))", false)]
    fn validity(#[case] wkt: &str, #[case] expected: bool) {
        assert_eq!(OfficeGeometry::from_wkt(wkt, Srid::WebMercator).unwrap().is_valid(), expected);
    }

    #[test]
    fn closes_an_open_ring() {
        let geometry = OfficeGeometry::from_wkt("polygon ((0 0, 10 0, 10 10, 0 10))", Srid::WebMercator).unwrap();
        assert!(geometry.is_valid());
        assert_eq!(geometry.area_m2(), 100.0);
    }

    #[rstest]
    #[case::point("POINT(1 2)")]
    #[case::empty("")]
    #[case::missing_paren("POLYGON((0 0, 1 0, 1 1, 0 0)")]
    #[case::bad_number("POLYGON((0 0, 1 x, 1 1, 0 0))")]
    fn rejects_malformed_wkt(#[case] wkt: &str) {
        assert!(OfficeGeometry::from_wkt(wkt, Srid::WebMercator).is_err());
    }

    #[test]
    fn wgs84_offices_are_projected() {
        let geometry = OfficeGeometry::from_wkt("POLYGON((106.8160 -6.2010, 106.8175 -6.2010, 106.8175 -6.1995, 106.8160 -6.1995, 106.8160 -6.2010))", Srid::Wgs84).unwrap();
        assert!(geometry.is_valid());
        assert!(geometry.covers(to_web_mercator(-6.2, 106.816666)));
        assert!(!geometry.covers(to_web_mercator(-6.21, 106.816666)));
    }
}
