use runtime::TaskError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("select a region on the map first")]
    SelectionIncomplete,
    #[error("{0} selections have no area; draw a circle, rectangle or polygon")]
    AreaRequired(&'static str),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("unexpected result payload: {0}")]
    MalformedResult(String),
    #[error("population query failed: {0}")]
    Population(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    #[error(transparent)]
    Task(#[from] TaskError),
}
