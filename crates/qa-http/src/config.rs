use crate::error::{QaHttpError, Result};

/// Service used when no base url is configured.
pub const DEFAULT_BASE_URL: &str = "https://seektube.onrender.com";
/// Environment variable overriding the service base url.
pub const BASE_URL_ENV: &str = "SEEKTUBE_API_URL";
/// Environment variable setting a whole-request timeout in seconds.
pub const TIMEOUT_ENV: &str = "SEEKTUBE_TIMEOUT_SECS";

/// Connection settings for [`crate::QaClient`].
///
/// `timeout_secs = None` leaves requests unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QaClientConfig {
    pub base_url: String,
    pub timeout_secs: Option<u64>,
}

impl Default for QaClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout_secs: None,
        }
    }
}

impl QaClientConfig {
    /// Loads configuration from `SEEKTUBE_API_URL` and `SEEKTUBE_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset or blank values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let timeout_secs = match lookup(TIMEOUT_ENV)
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
        {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        Ok(Self {
            base_url,
            timeout_secs,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: Option<u64>) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Absolute url of `path` on the configured service.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

fn parse_timeout(raw: &str) -> Result<u64> {
    match raw.parse::<u64>() {
        Ok(0) => Err(QaHttpError::Config(format!(
            "{TIMEOUT_ENV} must be positive"
        ))),
        Ok(secs) => Ok(secs),
        Err(err) => Err(QaHttpError::Config(format!(
            "invalid {TIMEOUT_ENV} {raw:?}: {err}"
        ))),
    }
}
