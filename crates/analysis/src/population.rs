//! Synchronous population query over a region's area.

use chrono::NaiveDateTime;
use foundation::GeoBounds;
use protocol::{GeometryDescriptor, LatLon, PopulationRequest, PopulationResponse};
use scene::{Region, Shape};
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::AnalysisError;
use crate::http::{check_status, HttpBackend};

/// Area descriptor for `region`, or `None` for a marker.
///
/// Circles keep their exact radius (in km); polygons are sent as their
/// bounding rectangle.
pub fn geometry_descriptor(region: &Region) -> Option<GeometryDescriptor> {
    match region.shape() {
        Shape::Marker { .. } => None,
        Shape::Circle { center, radius_m } => Some(GeometryDescriptor::Circle {
            center: LatLon {
                lat: center.lat,
                lon: center.lon,
            },
            radius: radius_m / 1000.0,
        }),
        Shape::Rectangle { bounds } => Some(rectangle(bounds)),
        Shape::Polygon { .. } => Some(rectangle(&region.bounds())),
    }
}

fn rectangle(bounds: &GeoBounds) -> GeometryDescriptor {
    GeometryDescriptor::Rectangle {
        bounds: [
            [bounds.southwest.lat, bounds.southwest.lon],
            [bounds.northeast.lat, bounds.northeast.lon],
        ],
    }
}

pub fn population_request(region: &Region) -> Result<PopulationRequest, AnalysisError> {
    geometry_descriptor(region)
        .map(|geometry| PopulationRequest { geometry })
        .ok_or(AnalysisError::AreaRequired(region.kind().as_str()))
}

/// Population estimate for one area.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationReport {
    pub total_population: u64,
    pub area_km2: f64,
    /// People per km².
    pub density: f64,
    pub geometry_type: String,
    pub data_source: String,
    /// Backend timestamp; `None` when absent or not ISO-8601.
    pub generated_at: Option<NaiveDateTime>,
}

impl PopulationReport {
    pub fn from_response(response: PopulationResponse) -> Result<Self, AnalysisError> {
        let data = match (response.success, response.data) {
            (true, Some(data)) => data,
            (_, _) => {
                let message = response
                    .error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or(response.message);
                return Err(AnalysisError::Population(if message.trim().is_empty() {
                    "backend reported no data".to_string()
                } else {
                    message
                }));
            }
        };
        let generated_at = parse_timestamp(&data.timestamp);
        Ok(Self {
            total_population: data.total_population,
            area_km2: data.area_km2,
            density: data.density,
            geometry_type: data.geometry_type,
            data_source: data.data_source,
            generated_at,
        })
    }
}

/// Backend timestamps are `YYYY-MM-DD HH:MM:SS`; ISO-8601 with a `T`
/// separator and fractional seconds is accepted too.
fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()
}

/// Client for `POST /population/analyze`.
///
/// Unlike weather and forecast jobs this call answers directly; there is no
/// task id and nothing to poll.
pub struct PopulationClient {
    http: reqwest::Client,
    config: ClientConfig,
}

impl PopulationClient {
    pub fn new(config: ClientConfig) -> Result<Self, AnalysisError> {
        let backend = HttpBackend::new(config)?;
        Ok(Self::from_backend(&backend))
    }

    /// Shares the connection pool of an existing backend.
    pub fn from_backend(backend: &HttpBackend) -> Self {
        Self {
            http: backend.client().clone(),
            config: backend.config().clone(),
        }
    }

    pub async fn analyze(
        &self,
        region: Option<&Region>,
    ) -> Result<PopulationReport, AnalysisError> {
        let region = region.ok_or(AnalysisError::SelectionIncomplete)?;
        let request = population_request(region)?;
        let url = self
            .config
            .endpoint(&["population", "analyze"])
            .map_err(AnalysisError::Population)?;
        debug!(%url, geometry = request.geometry.type_name(), "population query");

        let resp = self
            .http
            .post(url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AnalysisError::Population(e.to_string()))?;
        let body: PopulationResponse = check_status(resp)
            .await
            .map_err(|e| AnalysisError::Population(e.to_string()))?
            .json()
            .await
            .map_err(|e| AnalysisError::MalformedResult(e.to_string()))?;

        let report = PopulationReport::from_response(body)?;
        info!(
            population = report.total_population,
            area_km2 = report.area_km2,
            "population query completed"
        );
        Ok(report)
    }
}
