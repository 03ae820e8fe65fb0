use std::env;
use std::time::Duration;

use runtime::PollConfig;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000/api";

/// Settings shared by every analysis client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API root without a trailing slash, e.g. `http://host:5000/api`.
    pub base_url: String,
    pub poll_interval: Duration,
    /// Wall-clock ceiling for one task; `None` polls until the backend
    /// reports a terminal status.
    pub max_task_duration: Option<Duration>,
    /// Per-request transport timeout.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            poll_interval: Duration::from_secs(2),
            max_task_duration: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    /// Reads `ANALYSIS_API_URL`, `ANALYSIS_POLL_INTERVAL_MS`,
    /// `ANALYSIS_MAX_TASK_SECS` and `ANALYSIS_REQUEST_TIMEOUT_SECS`, falling
    /// back to the defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("ANALYSIS_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            poll_interval: Duration::from_millis(env_var_u64(
                "ANALYSIS_POLL_INTERVAL_MS",
                defaults.poll_interval.as_millis() as u64,
            )),
            max_task_duration: env_var_opt_u64("ANALYSIS_MAX_TASK_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            request_timeout: Duration::from_secs(env_var_u64(
                "ANALYSIS_REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: self.poll_interval,
            max_duration: self.max_task_duration,
        }
    }

    /// Appends `segments` to the API root, percent-encoding each one so a
    /// task id cannot alter the route.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<reqwest::Url, String> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| format!("invalid API url {:?}: {e}", self.base_url))?;
        url.path_segments_mut()
            .map_err(|_| format!("API url {:?} cannot take a path", self.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn env_var_u64(key: &str, default: u64) -> u64 {
    env_var_opt_u64(key).unwrap_or(default)
}

fn env_var_opt_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::{ClientConfig, DEFAULT_API_URL};
    use std::time::Duration;

    #[test]
    fn defaults_poll_every_two_seconds() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_API_URL);
        let poll = config.poll_config();
        assert_eq!(poll.interval, Duration::from_secs(2));
        assert_eq!(poll.max_duration, None);
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let config = ClientConfig::default().with_base_url("http://localhost:5000/api/");
        let url = config.endpoint(&["weather", "analyze"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/weather/analyze");
    }

    #[test]
    fn endpoint_escapes_segments() {
        let config = ClientConfig::default();
        let url = config.endpoint(&["weather", "progress", "a/../b?x=1"]).unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5000/api/weather/progress/a%2F..%2Fb%3Fx=1"
        );
    }

    #[test]
    fn endpoint_rejects_unparsable_root() {
        let config = ClientConfig::default().with_base_url("not a url");
        assert!(config.endpoint(&["weather", "analyze"]).is_err());
    }
}
