use std::fmt::{Display, Formatter};

use crate::session::{Phase, VideoId};

/// Result type used by the engine crate.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by engine commands that violate the session state machine.
///
/// Failures reported by the remote service are not engine errors: they are
/// classified into a [`crate::SessionError`] and stored on the session.
#[derive(Debug)]
pub enum EngineError {
    VideoNotReady {
        phase: Phase,
    },
    VideoAlreadyLoaded {
        video_id: VideoId,
    },
    ResetNotAllowed {
        phase: Phase,
    },
    RequestInFlight {
        phase: Phase,
    },
    BackendSetup {
        context: &'static str,
        source: std::io::Error,
    },
    Client(qa_http::QaHttpError),
}

impl Display for EngineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VideoNotReady { phase } => {
                write!(f, "no processed video to ask about (phase: {phase})")
            }
            Self::VideoAlreadyLoaded { video_id } => {
                write!(f, "video {video_id} is already loaded; reset the session first")
            }
            Self::ResetNotAllowed { phase } => {
                write!(f, "reset is only allowed once a video is ready (phase: {phase})")
            }
            Self::RequestInFlight { phase } => {
                write!(f, "a request is already in flight (phase: {phase})")
            }
            Self::BackendSetup { context, source } => write!(f, "{context}: {source}"),
            Self::Client(err) => write!(f, "service client error: {err}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::BackendSetup { source, .. } => Some(source),
            Self::Client(err) => Some(err),
            _ => None,
        }
    }
}

impl From<qa_http::QaHttpError> for EngineError {
    fn from(value: qa_http::QaHttpError) -> Self {
        Self::Client(value)
    }
}
