/// Error type for geometry primitives.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// Input cannot produce a meaningful result (e.g. centroid of nothing).
    InvalidGeometry { reason: String },
}

impl GeometryError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidGeometry { reason } => write!(f, "invalid geometry: {reason}"),
        }
    }
}

impl std::error::Error for GeometryError {}
