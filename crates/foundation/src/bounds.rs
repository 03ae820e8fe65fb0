use crate::point::Point;

/// Axis-aligned geographic box.
///
/// Invariant: `southwest` is component-wise `<=` `northeast`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub southwest: Point,
    pub northeast: Point,
}

impl GeoBounds {
    /// Builds the box spanned by two opposite corners, in either order.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self {
            southwest: Point::new(a.lat.min(b.lat), a.lon.min(b.lon)),
            northeast: Point::new(a.lat.max(b.lat), a.lon.max(b.lon)),
        }
    }

    /// Smallest box containing every point, or `None` for an empty slice.
    pub fn enclosing(points: &[Point]) -> Option<Self> {
        let first = *points.first()?;
        let mut min = first;
        let mut max = first;
        for p in points.iter().skip(1) {
            min.lat = min.lat.min(p.lat);
            min.lon = min.lon.min(p.lon);
            max.lat = max.lat.max(p.lat);
            max.lon = max.lon.max(p.lon);
        }
        Some(Self {
            southwest: min,
            northeast: max,
        })
    }

    pub fn lat_span(&self) -> f64 {
        self.northeast.lat - self.southwest.lat
    }

    pub fn lon_span(&self) -> f64 {
        self.northeast.lon - self.southwest.lon
    }

    pub fn center(&self) -> Point {
        self.southwest.midpoint(self.northeast)
    }

    /// Corners in ring order: SW, SE, NE, NW.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.southwest,
            Point::new(self.southwest.lat, self.northeast.lon),
            self.northeast,
            Point::new(self.northeast.lat, self.southwest.lon),
        ]
    }

    /// True when the box has zero extent along either axis.
    pub fn is_degenerate(&self) -> bool {
        self.lat_span() <= 0.0 || self.lon_span() <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::GeoBounds;
    use crate::point::Point;

    #[test]
    fn from_corners_is_order_independent() {
        let a = Point::new(10.0, 10.0);
        let b = Point::new(5.0, 20.0);
        let ab = GeoBounds::from_corners(a, b);
        let ba = GeoBounds::from_corners(b, a);
        assert_eq!(ab, ba);
        assert_eq!(ab.southwest, Point::new(5.0, 10.0));
        assert_eq!(ab.northeast, Point::new(10.0, 20.0));
    }

    #[test]
    fn enclosing_covers_all_points() {
        let pts = [
            Point::new(1.0, 5.0),
            Point::new(-2.0, 3.0),
            Point::new(4.0, -1.0),
        ];
        let b = GeoBounds::enclosing(&pts).unwrap();
        assert_eq!(b.southwest, Point::new(-2.0, -1.0));
        assert_eq!(b.northeast, Point::new(4.0, 5.0));
        assert!(GeoBounds::enclosing(&[]).is_none());
    }

    #[test]
    fn degenerate_when_flat() {
        let flat = GeoBounds::from_corners(Point::new(1.0, 1.0), Point::new(1.0, 3.0));
        assert!(flat.is_degenerate());
        let ok = GeoBounds::from_corners(Point::new(1.0, 1.0), Point::new(2.0, 3.0));
        assert!(!ok.is_degenerate());
    }
}
