//! reqwest-backed task backend.

use protocol::{ErrorBody, ProgressResponse, SubmitResponse};
use runtime::{
    BackendError, BoxFuture, ExportFormat, PollOutcome, Progress, TaskBackend, TaskKind,
};
use serde_json::Value;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::AnalysisError;

/// JSON-over-HTTP backend for the weather and prediction job routes.
pub struct HttpBackend {
    http: reqwest::Client,
    config: ClientConfig,
}

impl HttpBackend {
    pub fn new(config: ClientConfig) -> Result<Self, AnalysisError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(AnalysisError::HttpClient)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.http
    }
}

fn submit_path(kind: TaskKind) -> [&'static str; 2] {
    match kind {
        TaskKind::Weather => ["weather", "analyze"],
        TaskKind::Prediction => ["prediction", "forecast"],
    }
}

fn progress_path(kind: TaskKind, task_id: &str) -> [&str; 3] {
    [kind.as_str(), "progress", task_id]
}

fn cleanup_path(kind: TaskKind, task_id: &str) -> [&str; 3] {
    [kind.as_str(), "cleanup", task_id]
}

/// Only weather analyses can be exported.
fn export_path(kind: TaskKind, task_id: &str, format: ExportFormat) -> Option<[&str; 4]> {
    match kind {
        TaskKind::Weather => Some(["weather", "export", task_id, format.as_str()]),
        TaskKind::Prediction => None,
    }
}

impl HttpBackend {
    fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, BackendError> {
        self.config.endpoint(segments).map_err(BackendError::new)
    }
}

/// Interprets one progress body. A non-blank `error` wins over `completed`.
pub fn progress_outcome(response: ProgressResponse) -> PollOutcome {
    if let Some(message) = response.error_message() {
        return PollOutcome::Failed(message.to_string());
    }
    if response.is_completed() {
        return PollOutcome::Completed(response.into_result());
    }
    PollOutcome::Progress(Progress {
        percent: response.percent(),
        elapsed_seconds: response.elapsed_time,
        status: response.status,
    })
}

/// Builds the error message for a non-2xx reply, preferring the backend's
/// `{"error": ...}` body over the bare status line.
pub(crate) fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) if !parsed.error.trim().is_empty() => {
            format!("HTTP {}: {}", status.as_u16(), parsed.error.trim())
        }
        _ => format!("HTTP error: {status}"),
    }
}

pub(crate) async fn check_status(
    resp: reqwest::Response,
) -> Result<reqwest::Response, BackendError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(BackendError::new(describe_failure(status, &body)))
}

impl TaskBackend for HttpBackend {
    fn submit(
        &self,
        kind: TaskKind,
        payload: Value,
    ) -> BoxFuture<'_, Result<String, BackendError>> {
        Box::pin(async move {
            let url = self.endpoint(&submit_path(kind))?;
            debug!(%url, "submitting task");
            let resp = self
                .http
                .post(url)
                .json(&payload)
                .send()
                .await
                .map_err(|e| BackendError::with_source("HTTP request failed", e))?;
            let body: SubmitResponse = check_status(resp)
                .await?
                .json()
                .await
                .map_err(|e| BackendError::with_source("Malformed submit response", e))?;
            Ok(body.task_id)
        })
    }

    fn poll<'a>(
        &'a self,
        kind: TaskKind,
        task_id: &'a str,
    ) -> BoxFuture<'a, Result<PollOutcome, BackendError>> {
        Box::pin(async move {
            let url = self.endpoint(&progress_path(kind, task_id))?;
            let resp = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| BackendError::with_source("HTTP request failed", e))?;
            let body: ProgressResponse = check_status(resp)
                .await?
                .json()
                .await
                .map_err(|e| BackendError::with_source("Malformed progress response", e))?;
            Ok(progress_outcome(body))
        })
    }

    fn export<'a>(
        &'a self,
        kind: TaskKind,
        task_id: &'a str,
        format: ExportFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>, BackendError>> {
        Box::pin(async move {
            let Some(path) = export_path(kind, task_id, format) else {
                return Err(BackendError::new(format!(
                    "{} results cannot be exported",
                    kind.as_str()
                )));
            };
            let url = self.endpoint(&path)?;
            let resp = self
                .http
                .get(url)
                .send()
                .await
                .map_err(|e| BackendError::with_source("HTTP request failed", e))?;
            let bytes = check_status(resp)
                .await?
                .bytes()
                .await
                .map_err(|e| BackendError::with_source("Failed to read response", e))?;
            Ok(bytes.to_vec())
        })
    }

    fn cleanup<'a>(
        &'a self,
        kind: TaskKind,
        task_id: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>> {
        Box::pin(async move {
            let url = self.endpoint(&cleanup_path(kind, task_id))?;
            let resp = self
                .http
                .delete(url)
                .send()
                .await
                .map_err(|e| BackendError::with_source("HTTP request failed", e))?;
            check_status(resp).await?;
            Ok(())
        })
    }
}
