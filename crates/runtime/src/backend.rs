//! Backend seam of the task driver.
//!
//! A [`TaskBackend`] performs the four network calls the client needs. The
//! HTTP implementation lives in the `analysis` crate; tests use in-memory
//! doubles.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::task::{ExportFormat, PollOutcome, TaskKind};

/// Error type for backend calls (transport, HTTP status, malformed body).
#[derive(Debug)]
pub struct BackendError {
    pub message: String,
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.source {
            Some(source) => write!(f, "{}: {source}", self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for BackendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as _)
    }
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Type alias for a boxed future that can be sent between threads.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Network calls behind the start/poll/complete protocol.
///
/// Methods return boxed futures for dyn-compatibility.
pub trait TaskBackend: Send + Sync {
    /// Submits a job and returns the backend-assigned task id.
    fn submit(&self, kind: TaskKind, payload: Value) -> BoxFuture<'_, Result<String, BackendError>>;

    /// Fetches the current state of a task.
    fn poll<'a>(
        &'a self,
        kind: TaskKind,
        task_id: &'a str,
    ) -> BoxFuture<'a, Result<PollOutcome, BackendError>>;

    /// Downloads the finished artifact in the requested encoding.
    fn export<'a>(
        &'a self,
        kind: TaskKind,
        task_id: &'a str,
        format: ExportFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>, BackendError>>;

    /// Releases backend-side task state. Best effort.
    fn cleanup<'a>(
        &'a self,
        kind: TaskKind,
        task_id: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>>;
}
