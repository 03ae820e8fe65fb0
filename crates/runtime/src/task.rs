use serde_json::Value;

/// Kind of asynchronous backend computation a task runs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Weather,
    Prediction,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weather => "weather",
            Self::Prediction => "prediction",
        }
    }

    /// Payload fields that must be present (and non-null) before submitting.
    pub fn required_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Weather => &["latitude", "longitude", "startDate", "endDate"],
            Self::Prediction => &["latitude", "longitude", "targetDate"],
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TaskStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Encoding of an exported task artifact.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    pub fn extension(&self) -> &'static str {
        self.as_str()
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!("unsupported export format {other:?} (use csv or json)")),
        }
    }
}

/// Incremental progress reported by one poll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Progress {
    /// `0..=100`.
    pub percent: f64,
    pub elapsed_seconds: u64,
    /// Free-form backend status text.
    pub status: String,
}

/// Interpretation of one poll response.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    Progress(Progress),
    Completed(Value),
    Failed(String),
}

/// One backend computation as observed by the client.
///
/// Mutated only by the owning [`TaskClient`](crate::TaskClient). Once the
/// status is terminal the task no longer changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: String,
    pub kind: TaskKind,
    pub status: TaskStatus,
    pub progress_percent: f64,
    pub elapsed_seconds: u64,
    pub status_text: String,
    pub result: Option<Value>,
    pub error: Option<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, kind: TaskKind) -> Self {
        Self {
            id: id.into(),
            kind,
            status: TaskStatus::Pending,
            progress_percent: 0.0,
            elapsed_seconds: 0,
            status_text: String::new(),
            result: None,
            error: None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    pub(crate) fn apply(&mut self, outcome: PollOutcome) {
        if self.is_terminal() {
            return;
        }
        match outcome {
            PollOutcome::Progress(p) => {
                self.status = TaskStatus::Running;
                self.progress_percent = p.percent.clamp(0.0, 100.0);
                self.elapsed_seconds = p.elapsed_seconds;
                self.status_text = p.status;
            }
            PollOutcome::Completed(result) => {
                self.status = TaskStatus::Completed;
                self.progress_percent = 100.0;
                self.result = Some(result);
            }
            PollOutcome::Failed(message) => self.fail(message),
        }
    }

    pub(crate) fn fail(&mut self, message: impl Into<String>) {
        if self.is_terminal() {
            return;
        }
        let message = message.into();
        self.status = TaskStatus::Failed;
        self.error = Some(if message.trim().is_empty() {
            "task failed".to_string()
        } else {
            message
        });
    }
}
