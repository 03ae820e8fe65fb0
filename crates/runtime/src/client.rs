use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Notify;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, warn};

use crate::backend::TaskBackend;
use crate::error::TaskError;
use crate::task::{ExportFormat, Task, TaskKind, TaskStatus};

/// Poll loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between the end of one wait and the next poll.
    pub interval: Duration,
    /// Optional wall-clock ceiling for the whole task, measured from `run`.
    pub max_duration: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_duration: None,
        }
    }
}

/// Client-side lifecycle: `Idle -> Submitting -> Polling -> Completed | Failed`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ClientState {
    Idle,
    Submitting,
    Polling,
    Completed,
    Failed,
}

/// Stops a running poll loop from elsewhere (e.g. a close button).
///
/// A stop requested before `run` starts waiting is remembered.
#[derive(Debug, Clone)]
pub struct StopHandle(Arc<Notify>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.notify_one();
    }
}

/// Drives one backend task from submission to a terminal state.
///
/// Ordering contract:
/// - Polls are strictly sequential: poll N+1 is only issued after poll N's
///   response (or error) has been applied.
/// - No poll is issued once the task is terminal.
/// - A transport error on a poll fails the task immediately (no retry).
///
/// Teardown: [`TaskClient::close`] (or dropping the client inside a tokio
/// runtime) issues a best-effort cleanup for every submitted task that did
/// not complete. The backend computation itself is not aborted.
pub struct TaskClient {
    backend: Arc<dyn TaskBackend>,
    kind: TaskKind,
    config: PollConfig,
    state: ClientState,
    task: Option<Task>,
    stop: Arc<Notify>,
    released: bool,
}

impl TaskClient {
    pub fn new(backend: Arc<dyn TaskBackend>, kind: TaskKind, config: PollConfig) -> Self {
        Self {
            backend,
            kind,
            config,
            state: ClientState::Idle,
            task: None,
            stop: Arc::new(Notify::new()),
            released: false,
        }
    }

    pub fn kind(&self) -> TaskKind {
        self.kind
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle(Arc::clone(&self.stop))
    }

    /// Validates `payload`, submits it, and enters `Polling`.
    ///
    /// Input validation happens before any network call. A client runs at
    /// most one task; start a new client for a new request.
    pub async fn start(&mut self, payload: Value) -> Result<String, TaskError> {
        if self.state != ClientState::Idle {
            return Err(TaskError::AlreadyStarted);
        }
        for field in self.kind.required_fields() {
            if payload.get(*field).is_none_or(Value::is_null) {
                return Err(TaskError::MissingInput((*field).to_string()));
            }
        }

        self.state = ClientState::Submitting;
        let task_id = match self.backend.submit(self.kind, payload).await {
            Ok(id) if !id.trim().is_empty() => id,
            Ok(_) => {
                self.state = ClientState::Failed;
                return Err(TaskError::SubmissionFailed(
                    "backend returned an empty task id".to_string(),
                ));
            }
            Err(err) => {
                self.state = ClientState::Failed;
                warn!(kind = self.kind.as_str(), "task submission failed: {err}");
                return Err(TaskError::SubmissionFailed(err.to_string()));
            }
        };

        info!(kind = self.kind.as_str(), %task_id, "task submitted");
        self.task = Some(Task::new(task_id.clone(), self.kind));
        self.state = ClientState::Polling;
        Ok(task_id)
    }

    /// Performs a single poll and applies its outcome.
    ///
    /// On a terminal task this returns the task without contacting the
    /// backend.
    pub async fn tick(&mut self) -> Result<&Task, TaskError> {
        let kind = self.kind;
        let backend = Arc::clone(&self.backend);
        let Some(task) = self.task.as_mut() else {
            return Err(TaskError::NotStarted);
        };
        if task.is_terminal() {
            return Ok(task);
        }

        match backend.poll(kind, &task.id).await {
            Ok(outcome) => task.apply(outcome),
            Err(err) => {
                let message = err.to_string();
                warn!(kind = kind.as_str(), task_id = %task.id, "poll failed: {message}");
                task.fail(message.clone());
                self.state = ClientState::Failed;
                return Err(TaskError::PollFailed(message));
            }
        }

        debug!(
            kind = kind.as_str(),
            task_id = %task.id,
            percent = task.progress_percent,
            elapsed_s = task.elapsed_seconds,
            "poll applied"
        );
        match task.status {
            TaskStatus::Completed => {
                info!(kind = kind.as_str(), task_id = %task.id, "task completed");
                self.state = ClientState::Completed;
            }
            TaskStatus::Failed => {
                let message = task.error.clone().unwrap_or_default();
                warn!(kind = kind.as_str(), task_id = %task.id, "task failed: {message}");
                self.state = ClientState::Failed;
                return Err(TaskError::Failed(message));
            }
            TaskStatus::Pending | TaskStatus::Running => {}
        }
        Ok(task)
    }

    /// Polls on a fixed interval until the task is terminal, reporting every
    /// applied poll to `on_progress`.
    ///
    /// The first poll happens one interval after the call. Returns
    /// [`TaskError::Stopped`] when the [`StopHandle`] fires; the task is then
    /// left as last observed and may be resumed with another `run`.
    pub async fn run<F>(&mut self, mut on_progress: F) -> Result<&Task, TaskError>
    where
        F: FnMut(&Task),
    {
        match self.state {
            ClientState::Idle | ClientState::Submitting => return Err(TaskError::NotStarted),
            ClientState::Polling => {}
            ClientState::Completed => return self.task.as_ref().ok_or(TaskError::NotStarted),
            ClientState::Failed => {
                let message = self
                    .task
                    .as_ref()
                    .and_then(|t| t.error.clone())
                    .unwrap_or_else(|| "task failed".to_string());
                return Err(TaskError::Failed(message));
            }
        }

        let started = Instant::now();
        let mut ticker = interval_at(started + self.config.interval, self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let stop = Arc::clone(&self.stop);

        while self.state == ClientState::Polling {
            tokio::select! {
                _ = stop.notified() => {
                    debug!(kind = self.kind.as_str(), "polling stopped");
                    return Err(TaskError::Stopped);
                }
                _ = ticker.tick() => {}
            }

            if let Some(max) = self.config.max_duration {
                if started.elapsed() >= max {
                    if let Some(task) = self.task.as_mut() {
                        task.fail(format!("task did not finish within {max:?}"));
                    }
                    self.state = ClientState::Failed;
                    warn!(kind = self.kind.as_str(), "task timed out after {max:?}");
                    return Err(TaskError::TimedOut(max));
                }
            }

            let task = self.tick().await?;
            on_progress(task);
        }

        self.task.as_ref().ok_or(TaskError::NotStarted)
    }

    /// Downloads the result artifact. Only valid after completion; failures
    /// do not affect the stored result.
    pub async fn export(&self, format: ExportFormat) -> Result<Vec<u8>, TaskError> {
        let task = match (&self.task, self.state) {
            (Some(task), ClientState::Completed) => task,
            _ => return Err(TaskError::NotCompleted),
        };
        self.backend
            .export(self.kind, &task.id, format)
            .await
            .map_err(|err| {
                warn!(kind = self.kind.as_str(), task_id = %task.id, "export failed: {err}");
                TaskError::ExportFailed(err.to_string())
            })
    }

    /// Task whose backend state still has to be released: anything submitted
    /// that did not complete. Local failures (timeouts, transport errors)
    /// leave the backend task alive, so they count as well.
    fn pending_cleanup(&self) -> Option<&Task> {
        self.task.as_ref().filter(|t| t.status != TaskStatus::Completed)
    }

    /// Stops observing the task and releases backend state for a task that
    /// did not complete.
    pub async fn close(mut self) {
        self.stop.notify_one();
        self.released = true;
        let Some(task) = self.pending_cleanup() else {
            return;
        };
        match self.backend.cleanup(self.kind, &task.id).await {
            Ok(()) => debug!(kind = self.kind.as_str(), task_id = %task.id, "task cleaned up"),
            Err(err) => {
                warn!(kind = self.kind.as_str(), task_id = %task.id, "cleanup failed: {err}")
            }
        }
    }
}

impl Drop for TaskClient {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        let Some(task) = self.pending_cleanup() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let backend = Arc::clone(&self.backend);
        let kind = self.kind;
        let task_id = task.id.clone();
        handle.spawn(async move {
            if let Err(err) = backend.cleanup(kind, &task_id).await {
                warn!(kind = kind.as_str(), %task_id, "cleanup on drop failed: {err}");
            }
        });
    }
}

impl std::fmt::Debug for TaskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskClient")
            .field("kind", &self.kind)
            .field("config", &self.config)
            .field("state", &self.state)
            .field("task", &self.task)
            .finish_non_exhaustive()
    }
}
