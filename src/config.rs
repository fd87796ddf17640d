use std::{env, path::PathBuf, time::Duration};
use thiserror::Error;

/// Default backend address; the API server listens on :8081 in the local stack.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8081";
/// Default location of the persisted session, relative to the working directory.
pub const DEFAULT_SESSION_FILE: &str = ".netsecure/session.json";

/// Base URL variables, highest priority first. The last two are the names the web
/// front end was built with and are still honoured.
const API_URL_VARS: [&str; 3] = ["NETSECURE_API_URL", "VITE_API_URL", "VUE_APP_BACKEND_URL"];

/// AppConfig
///
/// Immutable configuration resolved once at startup and shared by the client, the
/// session store and the binary.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls log format and how strict loading is.
    pub env: Env,
    // Backend origin, without a trailing slash. Paths such as `/api/login` are appended.
    pub api_base_url: String,
    // Where the durable session document lives.
    pub session_file: PathBuf,
    // Optional per-request timeout. `None` means requests may wait indefinitely.
    pub request_timeout: Option<Duration>,
}

/// Env
///
/// Local runs fall back to localhost defaults; production insists on explicit values.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Env {
    Local,
    Production,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("an explicit API base URL (NETSECURE_API_URL) is required in production")]
    MissingApiUrl,
    #[error("invalid value `{value}` for {var}")]
    InvalidValue { var: &'static str, value: String },
}

impl Default for AppConfig {
    /// Local defaults, used by tests and as the base for builder-style overrides.
    fn default() -> Self {
        Self {
            env: Env::Local,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            request_timeout: None,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from the process environment (after `.env` has been
    /// applied by the caller).
    ///
    /// # Errors
    /// Fails fast in production when no base URL is set, and in any environment when
    /// the timeout is not a whole number of seconds.
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let explicit_url = API_URL_VARS
            .iter()
            .filter_map(|var| env::var(var).ok())
            .map(|v| v.trim().to_string())
            .find(|v| !v.is_empty());

        let api_base_url = match (env, explicit_url) {
            (_, Some(url)) => url,
            (Env::Local, None) => DEFAULT_API_BASE_URL.to_string(),
            (Env::Production, None) => return Err(ConfigError::MissingApiUrl),
        };

        let session_file = env::var("NETSECURE_SESSION_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));

        let request_timeout = match env::var("NETSECURE_HTTP_TIMEOUT_SECS") {
            Ok(raw) if !raw.trim().is_empty() => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| ConfigError::InvalidValue {
                        var: "NETSECURE_HTTP_TIMEOUT_SECS",
                        value: raw.clone(),
                    })?;
                Some(Duration::from_secs(secs))
            }
            _ => None,
        };

        Ok(Self {
            env,
            api_base_url: normalize_base_url(&api_base_url),
            session_file,
            request_timeout,
        })
    }

    pub fn with_api_base_url(mut self, url: impl AsRef<str>) -> Self {
        self.api_base_url = normalize_base_url(url.as_ref());
        self
    }

    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }
}

fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
