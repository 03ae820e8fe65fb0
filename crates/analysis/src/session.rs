//! Binding of [`TaskClient`] to the weather and forecast domains.

use std::marker::PhantomData;
use std::sync::Arc;

use chrono::NaiveDate;
use protocol::{default_climate_type, default_horizon, ForecastRequest, WeatherRequest};
use runtime::{
    ClientState, ExportFormat, PollConfig, StopHandle, Task, TaskBackend, TaskClient, TaskKind,
};
use scene::Region;
use serde_json::Value;

use crate::error::AnalysisError;
use crate::population::geometry_descriptor;
use crate::summary::{PredictionSummary, WeatherSummary};

/// Longest weather analysis range, in days.
pub const MAX_WEATHER_RANGE_DAYS: i64 = 365;

const DATE_FORMAT: &str = "%Y-%m-%d";

fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AnalysisError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| {
        AnalysisError::InvalidRequest(format!("{field} must be YYYY-MM-DD, got {value:?}"))
    })
}

/// A kind of analysis: how to build its request and read its result.
pub trait AnalysisKind {
    type Params;
    type Summary;

    const TASK: TaskKind;

    /// Submit payload anchored on the region's center.
    fn payload(region: &Region, params: &Self::Params) -> Result<Value, AnalysisError>;

    fn summarize(result: &Value) -> Result<Self::Summary, AnalysisError>;
}

/// Historical weather statistics over a date range.
#[derive(Debug, Clone, Copy)]
pub struct WeatherAnalysis;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeatherParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl WeatherParams {
    /// Validates a `YYYY-MM-DD` range: start on or before end, at most
    /// [`MAX_WEATHER_RANGE_DAYS`] apart.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, AnalysisError> {
        if start_date > end_date {
            return Err(AnalysisError::InvalidRequest(format!(
                "start date {start_date} is after end date {end_date}"
            )));
        }
        let days = (end_date - start_date).num_days();
        if days > MAX_WEATHER_RANGE_DAYS {
            return Err(AnalysisError::InvalidRequest(format!(
                "date range spans {days} days; the maximum is {MAX_WEATHER_RANGE_DAYS}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    pub fn parse(start_date: &str, end_date: &str) -> Result<Self, AnalysisError> {
        Self::new(
            parse_date("startDate", start_date)?,
            parse_date("endDate", end_date)?,
        )
    }
}

impl AnalysisKind for WeatherAnalysis {
    type Params = WeatherParams;
    type Summary = WeatherSummary;

    const TASK: TaskKind = TaskKind::Weather;

    fn payload(region: &Region, params: &WeatherParams) -> Result<Value, AnalysisError> {
        let center = region.center();
        let request = WeatherRequest {
            latitude: center.lat,
            longitude: center.lon,
            start_date: params.start_date.format(DATE_FORMAT).to_string(),
            end_date: params.end_date.format(DATE_FORMAT).to_string(),
            geometry: geometry_descriptor(region),
        };
        serde_json::to_value(request).map_err(|e| AnalysisError::InvalidRequest(e.to_string()))
    }

    fn summarize(result: &Value) -> Result<WeatherSummary, AnalysisError> {
        WeatherSummary::from_result(result)
    }
}

/// Model forecast for a single target date.
#[derive(Debug, Clone, Copy)]
pub struct PredictionAnalysis;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictionParams {
    pub target_date: NaiveDate,
    /// Days forecast from the target date, at least 1.
    pub horizon: u32,
    pub climate_type: String,
}

impl PredictionParams {
    pub fn new(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            horizon: default_horizon(),
            climate_type: default_climate_type(),
        }
    }

    pub fn parse(target_date: &str) -> Result<Self, AnalysisError> {
        Ok(Self::new(parse_date("targetDate", target_date)?))
    }

    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon.max(1);
        self
    }

    pub fn with_climate_type(mut self, climate_type: impl Into<String>) -> Self {
        self.climate_type = climate_type.into();
        self
    }
}

impl AnalysisKind for PredictionAnalysis {
    type Params = PredictionParams;
    type Summary = PredictionSummary;

    const TASK: TaskKind = TaskKind::Prediction;

    fn payload(region: &Region, params: &PredictionParams) -> Result<Value, AnalysisError> {
        let center = region.center();
        let request = ForecastRequest {
            latitude: center.lat,
            longitude: center.lon,
            target_date: params.target_date.format(DATE_FORMAT).to_string(),
            horizon: params.horizon,
            climate_type: params.climate_type.clone(),
            geometry: geometry_descriptor(region),
        };
        serde_json::to_value(request).map_err(|e| AnalysisError::InvalidRequest(e.to_string()))
    }

    fn summarize(result: &Value) -> Result<PredictionSummary, AnalysisError> {
        PredictionSummary::from_result(result)
    }
}

pub type WeatherSession = AnalysisSession<WeatherAnalysis>;
pub type PredictionSession = AnalysisSession<PredictionAnalysis>;

/// One outstanding analysis request.
///
/// Each session owns a fresh task; a new request always starts a new
/// session. Closing (or dropping) a session before completion releases the
/// backend task on a best-effort basis.
pub struct AnalysisSession<K: AnalysisKind> {
    client: TaskClient,
    _kind: PhantomData<K>,
}

impl<K: AnalysisKind> AnalysisSession<K> {
    /// Builds the request from the selected region and submits it.
    ///
    /// Fails with [`AnalysisError::SelectionIncomplete`] before any network
    /// call when no region is selected.
    pub async fn start(
        backend: Arc<dyn TaskBackend>,
        config: PollConfig,
        region: Option<&Region>,
        params: &K::Params,
    ) -> Result<Self, AnalysisError> {
        let region = region.ok_or(AnalysisError::SelectionIncomplete)?;
        let payload = K::payload(region, params)?;
        let mut client = TaskClient::new(backend, K::TASK, config);
        client.start(payload).await?;
        Ok(Self {
            client,
            _kind: PhantomData,
        })
    }

    /// Polls to completion and maps the result into the domain summary.
    pub async fn run<F>(&mut self, on_progress: F) -> Result<K::Summary, AnalysisError>
    where
        F: FnMut(&Task),
    {
        let task = self.client.run(on_progress).await?;
        let result = task.result.as_ref().ok_or_else(|| {
            AnalysisError::MalformedResult("completed task has no result".to_string())
        })?;
        K::summarize(result)
    }

    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, AnalysisError> {
        Ok(self.client.export(format).await?)
    }

    pub fn task(&self) -> Option<&Task> {
        self.client.task()
    }

    pub fn state(&self) -> ClientState {
        self.client.state()
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.client.stop_handle()
    }

    pub async fn close(self) {
        self.client.close().await;
    }
}
