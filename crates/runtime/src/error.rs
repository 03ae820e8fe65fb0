use std::time::Duration;

use thiserror::Error;

/// Failures of the task driver. Every variant leaves the client in a
/// settled state; nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TaskError {
    #[error("missing required input `{0}`")]
    MissingInput(String),
    #[error("this client already started a task")]
    AlreadyStarted,
    #[error("no task has been started")]
    NotStarted,
    #[error("task submission failed: {0}")]
    SubmissionFailed(String),
    #[error("task poll failed: {0}")]
    PollFailed(String),
    #[error("task failed: {0}")]
    Failed(String),
    #[error("task did not finish within {0:?}")]
    TimedOut(Duration),
    #[error("polling stopped before the task finished")]
    Stopped,
    #[error("export requires a completed task")]
    NotCompleted,
    #[error("export failed: {0}")]
    ExportFailed(String),
}
