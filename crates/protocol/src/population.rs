use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Area descriptor accepted by the backend.
///
/// `bounds` are `[[lat, lon], [lat, lon]]` (south-west, north-east);
/// circle `radius` is in kilometers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeometryDescriptor {
    Circle { center: LatLon, radius: f64 },
    Square { bounds: [[f64; 2]; 2] },
    Rectangle { bounds: [[f64; 2]; 2] },
}

impl GeometryDescriptor {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "circle",
            Self::Square { .. } => "square",
            Self::Rectangle { .. } => "rectangle",
        }
    }
}

/// `POST /population/analyze` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationRequest {
    pub geometry: GeometryDescriptor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationData {
    pub total_population: u64,
    pub area_km2: f64,
    /// People per km².
    pub density: f64,
    #[serde(default)]
    pub coordinates: Value,
    pub geometry_type: String,
    #[serde(default)]
    pub data_source: String,
    #[serde(default)]
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<PopulationData>,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
