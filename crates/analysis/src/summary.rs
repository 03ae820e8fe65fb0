//! Domain views over completed task results.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::AnalysisError;

/// Human-oriented digest of a weather analysis.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WeatherSummary {
    /// Day count, date range and location of the analysed period.
    #[serde(default)]
    pub overview: Value,
    /// Formatted averages (temperature, humidity, wind, precipitation).
    #[serde(default)]
    pub weather_highlights: BTreeMap<String, String>,
    /// Formatted probability of each extreme-weather category.
    #[serde(default)]
    pub risk_assessment: BTreeMap<String, String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub overall_risk_level: String,
    /// Chart series as returned by the backend; not part of the `summary`
    /// object itself.
    #[serde(skip)]
    pub charts: Value,
}

impl WeatherSummary {
    /// Reads the `summary` and `charts` members of a completed weather task.
    pub fn from_result(result: &Value) -> Result<Self, AnalysisError> {
        let summary = result
            .get("summary")
            .filter(|v| v.is_object())
            .ok_or_else(|| AnalysisError::MalformedResult("missing `summary` object".to_string()))?;
        let mut parsed: Self = serde_json::from_value(summary.clone())
            .map_err(|e| AnalysisError::MalformedResult(e.to_string()))?;
        parsed.charts = result.get("charts").cloned().unwrap_or(Value::Null);
        Ok(parsed)
    }
}

/// Digest of a forecast.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PredictionSummary {
    /// One entry per forecast day.
    #[serde(default)]
    pub predictions: Vec<Value>,
    /// `0..=100`; decreases with distance from the training window.
    pub accuracy_score: f64,
    /// `high`, `medium` or `low`.
    #[serde(default)]
    pub confidence_level: String,
    #[serde(default)]
    pub target_date: String,
    #[serde(default)]
    pub location: Value,
    #[serde(default)]
    pub summary: Value,
}

impl PredictionSummary {
    pub fn from_result(result: &Value) -> Result<Self, AnalysisError> {
        serde_json::from_value(result.clone())
            .map_err(|e| AnalysisError::MalformedResult(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::{PredictionSummary, WeatherSummary};
    use crate::error::AnalysisError;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn weather_summary_with_charts() {
        let result = json!({
            "summary": {
                "overview": {"total_days": 31},
                "weather_highlights": {"average_temperature": "9.4°C"},
                "risk_assessment": {"very_hot_days": "0.0%"},
                "recommendation": "Suitable for outdoor activity",
                "overall_risk_level": "low"
            },
            "charts": {"temperature": [1, 2, 3]},
            "statistics": {}
        });
        let summary = WeatherSummary::from_result(&result).unwrap();
        assert_eq!(summary.overall_risk_level, "low");
        assert_eq!(
            summary.weather_highlights.get("average_temperature").map(String::as_str),
            Some("9.4°C")
        );
        assert_eq!(summary.charts, json!({"temperature": [1, 2, 3]}));
    }

    #[test]
    fn weather_summary_requires_summary_object() {
        let err = WeatherSummary::from_result(&json!({"charts": {}})).unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResult(_)));
    }

    #[test]
    fn prediction_summary_parses_result() {
        let summary = PredictionSummary::from_result(&json!({
            "predictions": [{"date": "2030-06-01", "temperature": 27.1}],
            "accuracy_score": 61.0,
            "confidence_level": "medium",
            "days_from_2024": 2000,
            "target_date": "2030-06-01",
            "location": {"lat": 37.9, "lon": 23.7},
            "summary": {"headline": "warm"}
        }))
        .unwrap();
        assert_eq!(summary.predictions.len(), 1);
        assert_eq!(summary.confidence_level, "medium");
        assert_eq!(summary.accuracy_score, 61.0);
    }

    #[test]
    fn prediction_summary_needs_accuracy() {
        assert!(PredictionSummary::from_result(&json!({"predictions": []})).is_err());
    }
}
