//! Planar polygon routines over `(lat, lon)` degrees.
//!
//! Areas use the 111 km/degree approximation on both axes. This is accurate
//! enough for small and regional extents and degrades toward the poles.

use crate::error::GeometryError;
use crate::math::geodesy::KM_PER_DEGREE;
use crate::point::Point;

/// Below this absolute signed area (deg²) a ring is treated as collinear.
pub const DEGENERATE_AREA_EPSILON: f64 = 1e-10;

/// Representative center of a point set.
///
/// - 0 points: [`GeometryError::InvalidGeometry`]
/// - 1 point: the point itself
/// - 2 points: the midpoint
/// - 3+ points: shoelace (area-weighted) centroid of the ring, falling back
///   to the arithmetic mean when the ring is degenerate.
pub fn centroid(points: &[Point]) -> Result<Point, GeometryError> {
    match points {
        [] => Err(GeometryError::invalid("centroid of an empty point set")),
        [p] => Ok(*p),
        [a, b] => Ok(a.midpoint(*b)),
        _ => Ok(ring_centroid(points).unwrap_or_else(|| mean(points))),
    }
}

fn ring_centroid(points: &[Point]) -> Option<Point> {
    let mut area2 = 0.0;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for (a, b) in ring_edges(points) {
        let cross = a.lat * b.lon - b.lat * a.lon;
        area2 += cross;
        cx += (a.lat + b.lat) * cross;
        cy += (a.lon + b.lon) * cross;
    }
    let area = area2 / 2.0;
    if area.abs() < DEGENERATE_AREA_EPSILON {
        return None;
    }
    Some(Point::new(cx / (6.0 * area), cy / (6.0 * area)))
}

fn mean(points: &[Point]) -> Point {
    let n = points.len() as f64;
    let (lat, lon) = points
        .iter()
        .fold((0.0, 0.0), |(lat, lon), p| (lat + p.lat, lon + p.lon));
    Point::new(lat / n, lon / n)
}

/// Shoelace area of the ring in degrees², sign following winding order.
pub fn signed_area_deg2(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    let sum: f64 = ring_edges(points)
        .map(|(a, b)| a.lat * b.lon - b.lat * a.lon)
        .sum();
    sum / 2.0
}

/// Approximate ring area in km². Rings with fewer than 3 points have no area.
pub fn polygon_area_km2(points: &[Point]) -> f64 {
    signed_area_deg2(points).abs() * KM_PER_DEGREE * KM_PER_DEGREE
}

/// Convex hull by angular sort around the lowest `(lat, lon)` pivot followed
/// by a Graham pass.
///
/// Output starts at the pivot and winds counter-clockwise in `(lat, lon)`
/// space. Interior points, duplicates and points lying on a hull edge are
/// dropped. Inputs with fewer than 3 points are returned unchanged.
pub fn convex_hull(points: &[Point]) -> Vec<Point> {
    if points.len() < 3 {
        return points.to_vec();
    }

    let pivot = *points
        .iter()
        .min_by(|a, b| a.lat.total_cmp(&b.lat).then(a.lon.total_cmp(&b.lon)))
        .unwrap_or(&points[0]);

    let mut rest: Vec<(f64, f64, Point)> = points
        .iter()
        .filter(|p| **p != pivot)
        .map(|p| {
            let dx = p.lat - pivot.lat;
            let dy = p.lon - pivot.lon;
            (dy.atan2(dx), dx * dx + dy * dy, *p)
        })
        .collect();
    rest.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
    rest.dedup_by(|a, b| a.2 == b.2);

    let mut hull: Vec<Point> = Vec::with_capacity(rest.len() + 1);
    hull.push(pivot);
    for (_, _, p) in rest {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    hull
}

/// Z component of `(a - o) x (b - o)`; positive for a left turn.
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.lat - o.lat) * (b.lon - o.lon) - (a.lon - o.lon) * (b.lat - o.lat)
}

fn ring_edges(points: &[Point]) -> impl Iterator<Item = (Point, Point)> + '_ {
    points
        .iter()
        .copied()
        .zip(points.iter().copied().cycle().skip(1))
}
