use crate::point::Point;

/// Mean Earth radius (meters) used by the spherical approximation.
pub const EARTH_MEAN_RADIUS_M: f64 = 6_371_000.0;
/// Planar degree-to-distance factor used for areas and bounding boxes.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points (haversine, meters).
pub fn distance_meters(a: Point, b: Point) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_MEAN_RADIUS_M * c
}

/// Point `meters` due north of `origin` along its meridian.
///
/// Exact with respect to [`distance_meters`] as long as the result stays
/// below the pole.
pub fn offset_north(origin: Point, meters: f64) -> Point {
    let dlat = (meters / EARTH_MEAN_RADIUS_M).to_degrees();
    Point::new(origin.lat + dlat, origin.lon)
}

/// Half-extents `(lat_deg, lon_deg)` of the box enclosing a circle, using
/// the 111 km/degree approximation widened by `1/cos(lat)` for longitude.
pub fn circle_half_extents_deg(center: Point, radius_m: f64) -> (f64, f64) {
    let radius_km = radius_m / 1000.0;
    let lat_offset = radius_km / KM_PER_DEGREE;
    let cos_lat = center.lat.to_radians().cos().abs().max(1e-6);
    let lon_offset = (radius_km / (KM_PER_DEGREE * cos_lat)).min(180.0);
    (lat_offset, lon_offset)
}

#[cfg(test)]
mod tests {
    use super::{EARTH_MEAN_RADIUS_M, circle_half_extents_deg, distance_meters, offset_north};
    use crate::point::Point;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zero_distance_for_same_point() {
        let p = Point::new(41.0, 29.0);
        assert_close(distance_meters(p, p), 0.0, 1e-9);
    }

    #[test]
    fn one_degree_along_equator() {
        let d = distance_meters(Point::new(0.0, 0.0), Point::new(0.0, 1.0));
        let expected = EARTH_MEAN_RADIUS_M * 1f64.to_radians();
        assert_close(d, expected, 1e-6);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Point::new(41.0, 29.0);
        let b = Point::new(39.9, 32.8);
        assert_close(distance_meters(a, b), distance_meters(b, a), 1e-9);
    }

    #[test]
    fn quarter_meridian() {
        let d = distance_meters(Point::new(0.0, 0.0), Point::new(90.0, 0.0));
        assert_close(d, EARTH_MEAN_RADIUS_M * std::f64::consts::FRAC_PI_2, 1e-6);
    }

    #[test]
    fn offset_north_matches_haversine() {
        let origin = Point::new(0.0, 0.0);
        let p = offset_north(origin, 1000.0);
        assert_close(distance_meters(origin, p), 1000.0, 1e-6);
        assert_eq!(p.lon, origin.lon);
    }

    #[test]
    fn circle_extents_widen_with_latitude() {
        let (lat_eq, lon_eq) = circle_half_extents_deg(Point::new(0.0, 0.0), 111_000.0);
        assert_close(lat_eq, 1.0, 1e-12);
        assert_close(lon_eq, 1.0, 1e-12);

        let (lat_60, lon_60) = circle_half_extents_deg(Point::new(60.0, 0.0), 111_000.0);
        assert_close(lat_60, 1.0, 1e-12);
        assert_close(lon_60, 2.0, 1e-9);
    }
}
