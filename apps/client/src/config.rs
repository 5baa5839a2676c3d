use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
/// Every variable has a default so the client runs with zero environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the resume/question backend, e.g. `http://127.0.0.1:8000/api/v1`.
    pub api_base_url: String,
    /// Per-request timeout for gateway calls, in seconds.
    pub request_timeout_secs: u64,
    /// Path to the JSON file holding the job listings shown in the browser phase.
    pub jobs_file: String,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any variable source. `from_env` passes the process
    /// environment; tests pass controlled values.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            api_base_url: lookup("API_BASE_URL")
                .unwrap_or_else(|| "http://127.0.0.1:8000/api/v1".to_string()),
            request_timeout_secs: lookup("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|| "60".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a positive integer")?,
            jobs_file: lookup("JOBS_FILE").unwrap_or_else(|| "jobs.json".to_string()),
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}
