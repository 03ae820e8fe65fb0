use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use analysis::{AnalysisError, PredictionParams, PredictionSession, WeatherParams, WeatherSession};
use foundation::Point;
use pretty_assertions::assert_eq;
use runtime::{
    BackendError, BoxFuture, ClientState, ExportFormat, PollConfig, PollOutcome, Progress,
    TaskBackend, TaskError, TaskKind,
};
use scene::{MapEvent, SelectionController, Tool};
use serde_json::{json, Value};

/// In-memory backend: hands out sequential ids and replays poll outcomes.
#[derive(Default)]
struct MemoryBackend {
    polls: Mutex<VecDeque<PollOutcome>>,
    submitted: Mutex<Vec<(TaskKind, Value)>>,
    cleaned: Mutex<Vec<String>>,
}

impl MemoryBackend {
    fn scripted(outcomes: Vec<PollOutcome>) -> Arc<Self> {
        Arc::new(Self {
            polls: Mutex::new(outcomes.into()),
            ..Self::default()
        })
    }
}

impl TaskBackend for MemoryBackend {
    fn submit(
        &self,
        kind: TaskKind,
        payload: Value,
    ) -> BoxFuture<'_, Result<String, BackendError>> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push((kind, payload));
        let id = format!("{}-{}", kind.as_str(), submitted.len());
        Box::pin(async move { Ok(id) })
    }

    fn poll<'a>(
        &'a self,
        _kind: TaskKind,
        _task_id: &'a str,
    ) -> BoxFuture<'a, Result<PollOutcome, BackendError>> {
        let next = self
            .polls
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| BackendError::new("task not found"));
        Box::pin(async move { next })
    }

    fn export<'a>(
        &'a self,
        _kind: TaskKind,
        task_id: &'a str,
        format: ExportFormat,
    ) -> BoxFuture<'a, Result<Vec<u8>, BackendError>> {
        let body = format!("{task_id}.{}", format.extension()).into_bytes();
        Box::pin(async move { Ok(body) })
    }

    fn cleanup<'a>(
        &'a self,
        _kind: TaskKind,
        task_id: &'a str,
    ) -> BoxFuture<'a, Result<(), BackendError>> {
        self.cleaned.lock().unwrap().push(task_id.to_string());
        Box::pin(async { Ok(()) })
    }
}

fn progress(percent: f64) -> PollOutcome {
    PollOutcome::Progress(Progress {
        percent,
        elapsed_seconds: 0,
        status: "working".to_string(),
    })
}

fn draw_rectangle() -> SelectionController {
    let mut selection = SelectionController::new();
    selection.set_tool(Tool::Rectangle);
    selection.handle(MapEvent::Click(Point::new(10.0, 10.0)));
    selection.handle(MapEvent::Click(Point::new(5.0, 20.0)));
    selection
}

#[tokio::test(start_paused = true)]
async fn weather_analysis_from_drawn_rectangle() {
    let backend = MemoryBackend::scripted(vec![
        progress(10.0),
        progress(55.0),
        PollOutcome::Completed(json!({
            "summary": {
                "overview": {"total_days": 31},
                "weather_highlights": {"average_temperature": "12.0°C"},
                "risk_assessment": {},
                "recommendation": "Plan outdoor work freely",
                "overall_risk_level": "low"
            },
            "charts": {"temperature": []}
        })),
    ]);
    let selection = draw_rectangle();
    let params = WeatherParams::parse("2020-01-01", "2020-01-31").unwrap();

    let mut session = WeatherSession::start(
        backend.clone(),
        PollConfig::default(),
        selection.region(),
        &params,
    )
    .await
    .unwrap();

    let mut seen = Vec::new();
    let summary = session
        .run(|task| seen.push(task.progress_percent))
        .await
        .unwrap();

    assert_eq!(seen, vec![10.0, 55.0, 100.0]);
    assert_eq!(summary.overall_risk_level, "low");
    assert_eq!(summary.recommendation, "Plan outdoor work freely");
    assert_eq!(session.state(), ClientState::Completed);

    let submitted = backend.submitted.lock().unwrap().clone();
    assert_eq!(submitted.len(), 1);
    let (kind, payload) = &submitted[0];
    assert_eq!(*kind, TaskKind::Weather);
    assert_eq!(payload["startDate"], "2020-01-01");
    assert_eq!(payload["geometry"]["bounds"], json!([[5.0, 10.0], [10.0, 20.0]]));

    let csv = session.export(ExportFormat::Csv).await.unwrap();
    assert_eq!(csv, b"weather-1.csv".to_vec());

    session.close().await;
    assert!(backend.cleaned.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn forecast_failure_is_reported() {
    let backend = MemoryBackend::scripted(vec![
        progress(10.0),
        PollOutcome::Failed("model unavailable".to_string()),
    ]);
    let mut selection = SelectionController::new();
    selection.set_tool(Tool::Marker);
    selection.handle(MapEvent::Click(Point::new(37.98, 23.73)));

    let params = PredictionParams::parse("2030-06-01").unwrap();
    let mut session = PredictionSession::start(
        backend.clone(),
        PollConfig::default(),
        selection.region(),
        &params,
    )
    .await
    .unwrap();

    let err = session.run(|_| {}).await.unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::Task(TaskError::Failed(ref m)) if m == "model unavailable"
    ));
    assert_eq!(session.state(), ClientState::Failed);

    // Running again reports the same failure instead of a missing result.
    let again = session.run(|_| {}).await.unwrap_err();
    assert!(matches!(
        again,
        AnalysisError::Task(TaskError::Failed(ref m)) if m == "model unavailable"
    ));

    session.close().await;
    assert_eq!(backend.cleaned.lock().unwrap().clone(), vec!["prediction-1".to_string()]);
}

#[tokio::test]
async fn analysis_without_selection_never_submits() {
    let backend = MemoryBackend::scripted(Vec::new());
    let selection = SelectionController::new();
    let params = WeatherParams::parse("2020-01-01", "2020-01-31").unwrap();

    let err = WeatherSession::start(
        backend.clone(),
        PollConfig::default(),
        selection.region(),
        &params,
    )
    .await
        .err()
        .unwrap();

    assert!(matches!(err, AnalysisError::SelectionIncomplete));
    assert!(backend.submitted.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn closing_an_unfinished_session_cleans_up() {
    let backend = MemoryBackend::scripted(vec![progress(20.0)]);
    let selection = draw_rectangle();
    let params = WeatherParams::parse("2021-03-01", "2021-03-10").unwrap();

    let mut session = WeatherSession::start(
        backend.clone(),
        PollConfig::default(),
        selection.region(),
        &params,
    )
    .await
    .unwrap();
    let stop = session.stop_handle();

    let mut polls = 0;
    let err = session
        .run(|_| {
            polls += 1;
            stop.stop();
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AnalysisError::Task(TaskError::Stopped)));
    assert_eq!(polls, 1);
    assert_eq!(session.task().map(|t| t.progress_percent), Some(20.0));

    session.close().await;
    assert_eq!(backend.cleaned.lock().unwrap().clone(), vec!["weather-1".to_string()]);
}
