/// Geographic position in degrees.
///
/// Treated as planar `(x = lat, y = lon)` by the polygon routines.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.lat + other.lat) / 2.0, (self.lon + other.lon) / 2.0)
    }
}

impl From<(f64, f64)> for Point {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self::new(lat, lon)
    }
}
