use tracing::debug;

use crate::backend::QaBackend;
use crate::classify::BackendError;
use crate::session::{Answer, IngestStatus, RequestTicket, VideoId};

/// Successful ingestion reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReply {
    pub video_id: VideoId,
    pub status: IngestStatus,
}

/// Remote call a session asks its driver to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub ticket: RequestTicket,
    pub kind: RequestKind,
}

/// Payload of a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Ingest { url: String },
    Ask { question: String, video_id: VideoId },
}

/// Result of one request, tagged with the ticket it was issued under.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub ticket: RequestTicket,
    pub outcome: Outcome,
}

/// Outcome carried by a [`Completion`].
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Ingested(Result<IngestReply, BackendError>),
    Answered(Result<Answer, BackendError>),
}

/// Runs one request against `backend`, blocking until it finishes.
///
/// Failures are carried in the completion; this never panics or returns early.
pub fn execute<B>(backend: &B, request: Request) -> Completion
where
    B: QaBackend + ?Sized,
{
    let Request { ticket, kind } = request;
    let outcome = match kind {
        RequestKind::Ingest { url } => {
            debug!(%ticket, url, "sending ingest request");
            Outcome::Ingested(backend.ingest(&url))
        }
        RequestKind::Ask { question, video_id } => {
            debug!(%ticket, %video_id, "sending question");
            Outcome::Answered(backend.ask(&question, &video_id))
        }
    };
    Completion { ticket, outcome }
}
