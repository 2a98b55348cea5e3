use std::env;
use std::time::Duration;

use crate::error::AppError;

/// Default root of the static reference-manual pages.
pub const DEFAULT_MANUAL_URL: &str = "https://ktane.timwi.de/HTML";

/// Default per-request timeout for the solving service.
pub const DEFAULT_HTTP_TIMEOUT_MS: u64 = 10_000;

/// Where the solving service and the reference manual live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// Base URL of the round/solve endpoints, without a trailing slash.
    pub base_url: String,
    /// Base URL of the manual pages, without a trailing slash.
    pub manual_base_url: String,
    pub request_timeout: Duration,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: trim_slash(base_url.into()),
            manual_base_url: DEFAULT_MANUAL_URL.to_string(),
            request_timeout: Duration::from_millis(DEFAULT_HTTP_TIMEOUT_MS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// - `DEFUSER_API_URL` (required)
    /// - `DEFUSER_MANUAL_URL` (defaults to [`DEFAULT_MANUAL_URL`])
    /// - `DEFUSER_HTTP_TIMEOUT_MS` (defaults to [`DEFAULT_HTTP_TIMEOUT_MS`])
    pub fn from_env() -> Result<Self, AppError> {
        let base_url = must_var("DEFUSER_API_URL")?;
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::config(format!(
                "DEFUSER_API_URL must be an http(s) URL, got '{base_url}'"
            )));
        }

        let manual_base_url =
            env::var("DEFUSER_MANUAL_URL").unwrap_or_else(|_| DEFAULT_MANUAL_URL.to_string());

        let timeout_ms = match env::var("DEFUSER_HTTP_TIMEOUT_MS") {
            Ok(raw) => raw.parse::<u64>().map_err(|_| {
                AppError::config(format!(
                    "DEFUSER_HTTP_TIMEOUT_MS must be a whole number of milliseconds, got '{raw}'"
                ))
            })?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_MS,
        };

        Ok(Self {
            base_url: trim_slash(base_url),
            manual_base_url: trim_slash(manual_base_url),
            request_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .map_err(|_| AppError::config(format!("Required environment variable '{name}' is not set")))
}
