use reqwest::StatusCode;

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, QaHttpError>;

/// Errors raised while talking to the service.
#[derive(Debug, thiserror::Error)]
pub enum QaHttpError {
    /// The service answered with a non-success status.
    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Api {
        status: StatusCode,
        detail: Option<String>,
        code: Option<String>,
    },

    /// The request could not be sent or its response could not be read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid client configuration: {0}")]
    Config(String),
}
