use foundation::math::{centroid, circle_half_extents_deg, convex_hull, polygon_area_km2};
use foundation::{GeoBounds, GeometryError, Point};

/// Geometry kind of a finalized region.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Marker,
    Circle,
    Rectangle,
    Polygon,
}

impl ShapeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Marker => "marker",
            Self::Circle => "circle",
            Self::Rectangle => "rectangle",
            Self::Polygon => "polygon",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Marker { point: Point },
    Circle { center: Point, radius_m: f64 },
    Rectangle { bounds: GeoBounds },
    /// Always a convex hull with at least 3 vertices.
    Polygon { vertices: Vec<Point> },
}

/// A finalized selection with its derived center and area.
///
/// Center and area are computed once by the constructors; the value is
/// immutable afterwards. `area_km2` is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    shape: Shape,
    center: Point,
    area_km2: f64,
}

impl Region {
    pub fn marker(point: Point) -> Self {
        Self {
            shape: Shape::Marker { point },
            center: point,
            area_km2: 0.0,
        }
    }

    /// Circle around `center`. The radius must be positive and finite.
    pub fn circle(center: Point, radius_m: f64) -> Result<Self, GeometryError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(GeometryError::invalid(format!(
                "circle radius must be positive, got {radius_m}"
            )));
        }
        let radius_km = radius_m / 1000.0;
        Ok(Self {
            shape: Shape::Circle { center, radius_m },
            center,
            area_km2: std::f64::consts::PI * radius_km * radius_km,
        })
    }

    /// Rectangle spanned by two opposite corners given in any order.
    pub fn rectangle(a: Point, b: Point) -> Result<Self, GeometryError> {
        let bounds = GeoBounds::from_corners(a, b);
        if bounds.is_degenerate() {
            return Err(GeometryError::invalid("rectangle has zero area"));
        }
        let corners = bounds.corners();
        Ok(Self {
            shape: Shape::Rectangle { bounds },
            center: centroid(&corners)?,
            area_km2: polygon_area_km2(&corners),
        })
    }

    /// Convex polygon around the given points.
    ///
    /// Fails when the hull collapses to fewer than 3 vertices.
    pub fn polygon(points: &[Point]) -> Result<Self, GeometryError> {
        let vertices = convex_hull(points);
        if vertices.len() < 3 {
            return Err(GeometryError::invalid(format!(
                "polygon needs 3 hull vertices, got {}",
                vertices.len()
            )));
        }
        let center = centroid(&vertices)?;
        let area_km2 = polygon_area_km2(&vertices);
        Ok(Self {
            shape: Shape::Polygon { vertices },
            center,
            area_km2,
        })
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn kind(&self) -> ShapeKind {
        match self.shape {
            Shape::Marker { .. } => ShapeKind::Marker,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Rectangle { .. } => ShapeKind::Rectangle,
            Shape::Polygon { .. } => ShapeKind::Polygon,
        }
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn area_km2(&self) -> f64 {
        self.area_km2
    }

    /// True for shapes that cover an area rather than a single point.
    pub fn has_area(&self) -> bool {
        !matches!(self.shape, Shape::Marker { .. })
    }

    /// Bounding box of the region.
    pub fn bounds(&self) -> GeoBounds {
        match &self.shape {
            Shape::Marker { point } => GeoBounds::from_corners(*point, *point),
            Shape::Circle { center, radius_m } => {
                let (dlat, dlon) = circle_half_extents_deg(*center, *radius_m);
                GeoBounds::from_corners(
                    Point::new(center.lat - dlat, center.lon - dlon),
                    Point::new(center.lat + dlat, center.lon + dlon),
                )
            }
            Shape::Rectangle { bounds } => *bounds,
            Shape::Polygon { vertices } => {
                GeoBounds::enclosing(vertices).unwrap_or_else(|| {
                    GeoBounds::from_corners(self.center, self.center)
                })
            }
        }
    }
}
