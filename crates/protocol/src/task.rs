use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::population::GeometryDescriptor;

/// Task identifier assigned by the backend.
pub type TaskId = String;

/// `POST /weather/analyze` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryDescriptor>,
}

/// `POST /prediction/forecast` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// `YYYY-MM-DD`.
    pub target_date: String,
    #[serde(default = "default_horizon")]
    pub horizon: u32,
    #[serde(rename = "climate_type", default = "default_climate_type")]
    pub climate_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<GeometryDescriptor>,
}

pub fn default_horizon() -> u32 {
    1
}

pub fn default_climate_type() -> String {
    "mediterranean".to_string()
}

/// Reply to a task submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub task_id: TaskId,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

/// Reply to `GET .../progress/{task_id}`.
///
/// The weather route reports `percentage` (and a raw `progress` count); the
/// forecast route reports only `progress` on a 0..100 scale. Completion data
/// arrives either as `summary`/`charts`/`statistics`/`risk_analysis` or as a
/// single `result` object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressResponse {
    #[serde(default)]
    pub task_id: TaskId,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub percentage: Option<f64>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charts: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_analysis: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

impl ProgressResponse {
    /// Progress in percent, clamped to `0..=100`.
    pub fn percent(&self) -> f64 {
        self.percentage
            .or(self.progress)
            .unwrap_or(0.0)
            .clamp(0.0, 100.0)
    }

    /// Non-empty backend error message, if any.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref().filter(|e| !e.trim().is_empty())
    }

    pub fn is_completed(&self) -> bool {
        self.completed == Some(true)
    }

    /// Folds the completion fields into one result object.
    ///
    /// A `result` object is returned as is; otherwise the present fields
    /// among `summary`, `charts`, `statistics` and `risk_analysis` are
    /// collected under their own keys.
    pub fn into_result(self) -> Value {
        if let Some(result) = self.result {
            return result;
        }
        let mut out = Map::new();
        for (key, value) in [
            ("summary", self.summary),
            ("charts", self.charts),
            ("statistics", self.statistics),
            ("risk_analysis", self.risk_analysis),
        ] {
            if let Some(v) = value {
                out.insert(key.to_string(), v);
            }
        }
        Value::Object(out)
    }
}
