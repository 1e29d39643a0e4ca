//! Geofence shapes.
//!
//! Shapes form a closed set of variants behind [`GeofenceGeometry`]. Every
//! variant answers the same three questions: does it contain a point, where is
//! its centroid, and how large is it. New shapes are added as new variants.

use crate::coordinate::{longitude_delta, normalize_longitude, Coordinate, EARTH_RADIUS_METERS};
use crate::error::{GeometryError, Result};
use serde::{Deserialize, Serialize};

/// Geometry of a geofence or region.
///
/// Serialized with an internal `type` tag:
/// `{ "type": "circle", "center": {..}, "radius": 100.0 }` or
/// `{ "type": "polygon", "coordinates": [..] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeofenceGeometry {
    Circle(CircleGeometry),
    Polygon(PolygonGeometry),
}

impl GeofenceGeometry {
    /// Shorthand for a validated circle.
    pub fn circle(center: Coordinate, radius: f64) -> Result<Self> {
        CircleGeometry::new(center, radius).map(Self::Circle)
    }

    /// Shorthand for a validated polygon.
    pub fn polygon(vertices: Vec<Coordinate>) -> Result<Self> {
        PolygonGeometry::new(vertices).map(Self::Polygon)
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        match self {
            Self::Circle(c) => c.contains(point),
            Self::Polygon(p) => p.contains(point),
        }
    }

    pub fn centroid(&self) -> Coordinate {
        match self {
            Self::Circle(c) => c.center(),
            Self::Polygon(p) => p.centroid(),
        }
    }

    /// Approximate surface area in square meters.
    ///
    /// Smaller means tighter. For circles this orders the same way as radius.
    pub fn area(&self) -> f64 {
        match self {
            Self::Circle(c) => c.area(),
            Self::Polygon(p) => p.area(),
        }
    }

    /// Short name of the variant, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Circle(_) => "circle",
            Self::Polygon(_) => "polygon",
        }
    }
}

/// Circle defined by a center and a radius in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCircle")]
pub struct CircleGeometry {
    center: Coordinate,
    radius: f64,
}

#[derive(Deserialize)]
struct RawCircle {
    center: Coordinate,
    radius: f64,
}

impl TryFrom<RawCircle> for CircleGeometry {
    type Error = GeometryError;

    fn try_from(raw: RawCircle) -> Result<Self> {
        CircleGeometry::new(raw.center, raw.radius)
    }
}

impl CircleGeometry {
    pub fn new(center: Coordinate, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GeometryError::InvalidRadius(radius));
        }
        Ok(Self { center, radius })
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    /// Radius in meters.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Inclusive: a point exactly on the boundary is inside.
    pub fn contains(&self, point: &Coordinate) -> bool {
        self.center.distance_to(point) <= self.radius
    }

    pub fn area(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius
    }
}

/// Simple polygon given by its outer ring.
///
/// The ring is stored open (the closing vertex is not repeated).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawPolygon")]
pub struct PolygonGeometry {
    coordinates: Vec<Coordinate>,
}

#[derive(Deserialize)]
struct RawPolygon {
    coordinates: Vec<Coordinate>,
}

impl TryFrom<RawPolygon> for PolygonGeometry {
    type Error = GeometryError;

    fn try_from(raw: RawPolygon) -> Result<Self> {
        PolygonGeometry::new(raw.coordinates)
    }
}

impl PolygonGeometry {
    /// Builds a polygon from its ring.
    ///
    /// Consecutive duplicate vertices and a closing vertex equal to the first
    /// one are dropped before counting.
    pub fn new(vertices: Vec<Coordinate>) -> Result<Self> {
        let mut ring: Vec<Coordinate> = Vec::with_capacity(vertices.len());
        for v in vertices {
            if ring.last() != Some(&v) {
                ring.push(v);
            }
        }
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(GeometryError::TooFewVertices(ring.len()));
        }
        Ok(Self { coordinates: ring })
    }

    pub fn vertices(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Even-odd ray casting in the (lng, lat) plane, longitudes taken relative
    /// to the centroid. Vertices count as inside.
    pub fn contains(&self, point: &Coordinate) -> bool {
        let origin = self.centroid().longitude();
        let x = |c: &Coordinate| longitude_delta(origin, c.longitude());
        let (px, py) = (x(point), point.latitude());
        let ring = &self.coordinates;
        let mut inside = false;

        let mut j = ring.len() - 1;
        for i in 0..ring.len() {
            let (xi, yi) = (x(&ring[i]), ring[i].latitude());
            let (xj, yj) = (x(&ring[j]), ring[j].latitude());

            if xi == px && yi == py {
                return true;
            }

            if (yi > py) != (yj > py) {
                let x_cross = xi + (py - yi) * (xj - xi) / (yj - yi);
                if px < x_cross {
                    inside = !inside;
                }
            }
            j = i;
        }

        inside
    }

    /// Average of the ring vertices. Longitudes are averaged as offsets from
    /// the first vertex, so rings crossing the antimeridian stay compact.
    pub fn centroid(&self) -> Coordinate {
        let n = self.coordinates.len() as f64;
        let origin = self.coordinates[0].longitude();
        let (lat, d_lng) = self.coordinates.iter().fold((0.0, 0.0), |(lat, d_lng), c| {
            (lat + c.latitude(), d_lng + longitude_delta(origin, c.longitude()))
        });
        Coordinate::new(lat / n, normalize_longitude(origin + d_lng / n))
            .unwrap_or(self.coordinates[0])
    }

    /// Shoelace area on an equirectangular projection around the centroid.
    pub fn area(&self) -> f64 {
        let center = self.centroid();
        let lat0 = center.latitude().to_radians();
        let project = |c: &Coordinate| {
            (
                EARTH_RADIUS_METERS
                    * longitude_delta(center.longitude(), c.longitude()).to_radians()
                    * lat0.cos(),
                EARTH_RADIUS_METERS * c.latitude().to_radians(),
            )
        };

        let ring = &self.coordinates;
        let mut twice_area = 0.0;
        for i in 0..ring.len() {
            let (x1, y1) = project(&ring[i]);
            let (x2, y2) = project(&ring[(i + 1) % ring.len()]);
            twice_area += x1 * y2 - x2 * y1;
        }
        twice_area.abs() / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn square(lat: f64, lng: f64, half: f64) -> PolygonGeometry {
        PolygonGeometry::new(vec![
            coord(lat - half, lng - half),
            coord(lat - half, lng + half),
            coord(lat + half, lng + half),
            coord(lat + half, lng - half),
        ])
        .unwrap()
    }

    #[test]
    fn test_circle_rejects_bad_radius() {
        let c = coord(0.0, 0.0);
        assert_eq!(
            CircleGeometry::new(c, 0.0),
            Err(GeometryError::InvalidRadius(0.0))
        );
        assert!(CircleGeometry::new(c, -5.0).is_err());
        assert!(CircleGeometry::new(c, f64::INFINITY).is_err());
    }

    #[test]
    fn test_circle_contains_boundary() {
        let center = coord(40.7128, -74.0060);
        let circle = CircleGeometry::new(center, 100.0).unwrap();
        let edge = center.offset(90.0, 99.99);
        assert!(circle.contains(&edge));
        assert!(!circle.contains(&center.offset(90.0, 100.5)));
    }

    #[test]
    fn test_polygon_drops_closing_vertex() {
        let a = coord(0.0, 0.0);
        let poly = PolygonGeometry::new(vec![a, coord(0.0, 1.0), coord(1.0, 1.0), a]).unwrap();
        assert_eq!(poly.vertices().len(), 3);
    }

    #[test]
    fn test_polygon_rejects_degenerate() {
        let a = coord(0.0, 0.0);
        let b = coord(0.0, 1.0);
        assert_eq!(
            PolygonGeometry::new(vec![a, b, b, a]),
            Err(GeometryError::TooFewVertices(2))
        );
    }

    #[test]
    fn test_polygon_contains() {
        let poly = square(10.0, 10.0, 0.01);
        assert!(poly.contains(&coord(10.0, 10.0)));
        assert!(poly.contains(&coord(9.99, 9.99)));
        assert!(!poly.contains(&coord(10.02, 10.0)));
        assert!(!poly.contains(&coord(10.0, 9.98)));
    }

    #[test]
    fn test_polygon_concave() {
        // U shape opening north; the notch is outside.
        let poly = PolygonGeometry::new(vec![
            coord(0.0, 0.0),
            coord(0.0, 3.0),
            coord(3.0, 3.0),
            coord(3.0, 2.0),
            coord(1.0, 2.0),
            coord(1.0, 1.0),
            coord(3.0, 1.0),
            coord(3.0, 0.0),
        ])
        .unwrap();
        assert!(poly.contains(&coord(0.5, 1.5)));
        assert!(!poly.contains(&coord(2.0, 1.5)));
        assert!(poly.contains(&coord(2.0, 0.5)));
    }

    #[test]
    fn test_polygon_area_close_to_square() {
        // ~0.02 degrees at the equator is about 2.224 km a side.
        let poly = square(0.0, 0.0, 0.01);
        let side = 2.0 * 0.01_f64.to_radians() * EARTH_RADIUS_METERS;
        let expected = side * side;
        assert!((poly.area() - expected).abs() / expected < 1e-3);
    }

    #[test]
    fn test_circle_area_orders_by_radius() {
        let c = coord(1.0, 1.0);
        let small = GeofenceGeometry::circle(c, 50.0).unwrap();
        let large = GeofenceGeometry::circle(c, 51.0).unwrap();
        assert!(small.area() < large.area());
    }

    #[test]
    fn test_geometry_json_shape() {
        let g = GeofenceGeometry::circle(coord(40.0, -74.0), 100.0).unwrap();
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["type"], "circle");
        assert_eq!(json["radius"], 100.0);
        assert_eq!(json["center"]["lat"], 40.0);

        let back: GeofenceGeometry = serde_json::from_value(json).unwrap();
        assert_eq!(back, g);
    }

    #[test]
    fn test_geometry_json_rejects_bad_radius() {
        let raw = r#"{"type":"circle","center":{"lat":0,"lng":0},"radius":0}"#;
        assert!(serde_json::from_str::<GeofenceGeometry>(raw).is_err());
    }

    #[test]
    fn test_polygon_centroid() {
        let poly = square(45.0, 7.0, 0.5);
        let c = GeofenceGeometry::Polygon(poly).centroid();
        assert!((c.latitude() - 45.0).abs() < 1e-9);
        assert!((c.longitude() - 7.0).abs() < 1e-9);
    }

    #[test]
    fn test_polygon_across_antimeridian() {
        let poly = PolygonGeometry::new(vec![
            coord(-17.1, 179.9),
            coord(-17.1, -179.9),
            coord(-16.9, -179.9),
            coord(-16.9, 179.9),
        ])
        .unwrap();

        let c = poly.centroid();
        assert!((c.latitude() + 17.0).abs() < 1e-9);
        assert!(c.longitude().abs() > 179.99, "centroid {c}");
        assert!(poly.contains(&coord(-17.0, 179.95)));
        assert!(poly.contains(&coord(-17.0, -179.95)));
        assert!(!poly.contains(&coord(-17.0, 0.0)));
        assert!(!poly.contains(&coord(-17.0, 179.5)));

        // Same size as the equivalent square away from the antimeridian.
        let reference = square(-17.0, 10.0, 0.1).area();
        assert!((poly.area() - reference).abs() / reference < 1e-6);
    }
}
