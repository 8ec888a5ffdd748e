use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Message shown when the service reports that the video has no usable captions.
pub const CAPTIONS_UNAVAILABLE_MESSAGE: &str = "This video doesn't have available subtitles. \
Please try a different YouTube video that has captions/transcripts enabled.";

/// Message shown for every failed question, whatever the cause.
pub const QUERY_FAILED_MESSAGE: &str = "Failed to get response. Please try again.";

const BACKEND_ERROR_LABEL: &str = "Backend error";
const INGEST_FAILED_PREFIX: &str = "Failed to process video.";
const INGEST_FAILED_HINT: &str = "Please check the URL and try again.";
const SUBTITLES_MARKER: &str = "subtitles";

/// Failure reported by the remote collaborator, as seen by the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The service answered with an error payload.
    Rejected {
        status: Option<u16>,
        detail: Option<String>,
        code: Option<String>,
    },
    /// The request never produced a usable response.
    Transport { message: String },
}

impl Display for BackendError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected {
                status: Some(status),
                detail: Some(detail),
                ..
            } if !detail.is_empty() => {
                write!(f, "service rejected request ({status}): {detail}")
            }
            Self::Rejected {
                detail: Some(detail),
                ..
            } if !detail.is_empty() => write!(f, "service rejected request: {detail}"),
            Self::Rejected {
                status: Some(status),
                ..
            } => write!(f, "Request failed with status code {status}"),
            Self::Rejected { .. } => write!(f, "service rejected request"),
            Self::Transport { message } => write!(f, "{message}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// Structured failure codes the service may attach to an error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    SubtitlesUnavailable,
}

impl ErrorCode {
    /// Parses a wire code, returning `None` for codes this client does not know.
    pub fn parse(code: &str) -> Option<Self> {
        match code.trim() {
            "subtitles_unavailable" | "no_subtitles" => Some(Self::SubtitlesUnavailable),
            _ => None,
        }
    }
}

/// Category of a user-facing session error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    CaptionsUnavailable,
    Backend,
    Transport,
    Query,
}

/// Classified, user-facing error stored as the session's `last_error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionError {
    pub kind: ErrorKind,
    pub message: String,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Maps an ingestion failure to the message shown to the user.
///
/// A structured code wins over the wording of `detail`; the substring check
/// only covers services that do not send a code.
///
/// # Example
/// ```
/// use engine::{BackendError, ErrorKind, classify_ingest_failure};
///
/// let error = classify_ingest_failure(&BackendError::Rejected {
///     status: Some(400),
///     detail: Some("Invalid URL format".to_owned()),
///     code: None,
/// });
/// assert_eq!(error.kind, ErrorKind::Backend);
/// assert_eq!(error.message, "Backend error: Invalid URL format");
/// ```
pub fn classify_ingest_failure(error: &BackendError) -> SessionError {
    match error {
        BackendError::Rejected { detail, code, .. } => {
            let coded = code.as_deref().and_then(ErrorCode::parse);
            if coded == Some(ErrorCode::SubtitlesUnavailable) {
                return captions_unavailable();
            }
            match detail {
                Some(detail) if detail.contains(SUBTITLES_MARKER) => captions_unavailable(),
                Some(detail) if !detail.is_empty() => SessionError {
                    kind: ErrorKind::Backend,
                    message: format!("{BACKEND_ERROR_LABEL}: {detail}"),
                },
                // An empty detail carries no reason.
                Some(_) | None => transport_failure(&error.to_string()),
            }
        }
        BackendError::Transport { message } => transport_failure(message),
    }
}

/// Maps a question failure to the single generic retry message.
pub fn classify_query_failure(_error: &BackendError) -> SessionError {
    SessionError {
        kind: ErrorKind::Query,
        message: QUERY_FAILED_MESSAGE.to_owned(),
    }
}

fn captions_unavailable() -> SessionError {
    SessionError {
        kind: ErrorKind::CaptionsUnavailable,
        message: CAPTIONS_UNAVAILABLE_MESSAGE.to_owned(),
    }
}

fn transport_failure(low_level: &str) -> SessionError {
    let low_level = low_level.trim();
    let message = if low_level.is_empty() {
        format!("{INGEST_FAILED_PREFIX} {INGEST_FAILED_HINT}")
    } else {
        format!("{INGEST_FAILED_PREFIX} {low_level}")
    };
    SessionError {
        kind: ErrorKind::Transport,
        message,
    }
}
