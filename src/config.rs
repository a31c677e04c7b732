use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api/v1";
const DEFAULT_LOG_FILE: &str = "telemetry-dashboard.log";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

/// Optional credentials for logging in without the login screen.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub api: ApiConfig,
    pub credentials: Option<Credentials>,
    pub session_file: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("TELEMETRY_API_BASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim()
            .trim_end_matches('/')
            .to_string();

        let timeout_secs = match lookup("TELEMETRY_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("TELEMETRY_HTTP_TIMEOUT_SECS must be a number, got {raw:?}"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let credentials = match (lookup("TELEMETRY_USERNAME"), lookup("TELEMETRY_PASSWORD")) {
            (Some(username), Some(password)) if !username.is_empty() => Some(Credentials {
                username,
                password,
            }),
            (Some(_), None) => anyhow::bail!("TELEMETRY_PASSWORD must be set when TELEMETRY_USERNAME is"),
            _ => None,
        };

        let session_file = match lookup("TELEMETRY_SESSION_FILE") {
            Some(path) => PathBuf::from(path),
            None => default_session_file(),
        };

        let log_file = lookup("TELEMETRY_LOG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            credentials,
            session_file,
            log_file,
        })
    }
}

fn default_session_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("telemetry-dashboard")
        .join("session.json")
}
