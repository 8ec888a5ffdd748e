//! UI-agnostic session core for asking questions about a video transcript.

pub mod api;
pub mod backend;
pub mod classify;
pub mod dispatch;
pub mod error;
pub mod render;
pub mod session;
pub mod time;

pub use api::{Command, Engine, Event};
pub use backend::{HttpQaBackend, QaBackend};
pub use classify::{
    BackendError, ErrorCode, ErrorKind, SessionError, classify_ingest_failure,
    classify_query_failure,
};
pub use dispatch::{Completion, IngestReply, Outcome, Request, RequestKind, execute};
pub use error::{EngineError, Result};
pub use render::{
    AnswerTone, LinkTarget, NOT_FOUND_ANSWER, RenderedAnswer, SourceLink, describe_source, render,
};
pub use session::{
    Answer, Applied, IngestStatus, Phase, RequestTicket, Session, SessionSnapshot, Timestamp,
    VideoId,
};
pub use time::format_timestamp;
