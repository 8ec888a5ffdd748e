use std::fmt::{Display, Formatter};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::classify::{SessionError, classify_ingest_failure, classify_query_failure};
use crate::dispatch::{Completion, Outcome, Request, RequestKind};

/// Opaque identifier of an ingested video, as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for VideoId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ingestion outcome reported by the service. Both values mean "ready".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IngestStatus {
    Processed,
    AlreadyProcessed,
}

/// Pointer into the source video.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timestamp {
    pub start_seconds: f64,
    pub url: String,
}

/// Answer to one question. Timestamps keep the order the service returned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Answer {
    pub text: String,
    pub timestamps: Vec<Timestamp>,
}

/// Session phase. Payload fields are only meaningful in the phases noted on
/// [`Session`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Ready,
    Querying,
}

impl Display for Phase {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Submitting => "submitting",
            Self::Ready => "ready",
            Self::Querying => "querying",
        };
        f.write_str(name)
    }
}

/// Identifies one request issued by a session.
///
/// A completion is applied only while its ticket is the session's pending one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl Display for RequestTicket {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Effect of applying one completion to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// The completion belonged to a request the session no longer waits for.
    Stale,
    VideoReady,
    AnswerReady,
    Failed(SessionError),
}

/// The single mutable unit of client state.
///
/// `video_id` is set exactly in `Ready` and `Querying`. `pending` is set exactly
/// in `Submitting` and `Querying`.
#[derive(Debug, Clone, Default)]
pub struct Session {
    source_url: String,
    video_id: Option<VideoId>,
    ingest_status: Option<IngestStatus>,
    question: String,
    answer: Option<Answer>,
    phase: Phase,
    last_error: Option<SessionError>,
    pending: Option<RequestTicket>,
    issued_tickets: u64,
}

impl Session {
    /// Creates an idle session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts ingesting `url`.
    ///
    /// Returns `None` without touching state when the trimmed url is empty or
    /// the session is not idle.
    ///
    /// # Example
    /// ```
    /// use engine::{Phase, Session};
    ///
    /// let mut session = Session::new();
    /// assert!(session.submit("   ").is_none());
    /// assert!(session.submit(" https://youtu.be/abc123 ").is_some());
    /// assert_eq!(session.phase(), Phase::Submitting);
    /// assert_eq!(session.source_url(), "https://youtu.be/abc123");
    /// ```
    pub fn submit(&mut self, url: &str) -> Option<Request> {
        let url = url.trim();
        if url.is_empty() || self.phase != Phase::Idle {
            return None;
        }

        self.source_url = url.to_owned();
        self.last_error = None;
        self.phase = Phase::Submitting;
        let ticket = self.issue_ticket();
        debug!(%ticket, url, "ingest requested");

        Some(Request {
            ticket,
            kind: RequestKind::Ingest {
                url: url.to_owned(),
            },
        })
    }

    /// Starts asking `question` about the active video.
    ///
    /// Returns `None` without touching state when the trimmed question is empty
    /// or no video is ready.
    pub fn ask(&mut self, question: &str) -> Option<Request> {
        let question = question.trim();
        if question.is_empty() || self.phase != Phase::Ready {
            return None;
        }
        let video_id = self.video_id.clone()?;

        self.question = question.to_owned();
        self.last_error = None;
        self.answer = None;
        self.phase = Phase::Querying;
        let ticket = self.issue_ticket();
        debug!(%ticket, %video_id, "question requested");

        Some(Request {
            ticket,
            kind: RequestKind::Ask {
                question: question.to_owned(),
                video_id,
            },
        })
    }

    /// Applies the result of a previously issued request.
    pub fn apply(&mut self, completion: Completion) -> Applied {
        if self.pending != Some(completion.ticket) {
            debug!(
                ticket = %completion.ticket,
                phase = %self.phase,
                "discarding stale completion"
            );
            return Applied::Stale;
        }
        self.pending = None;

        match completion.outcome {
            Outcome::Ingested(Ok(reply)) => {
                if reply.status == IngestStatus::AlreadyProcessed {
                    info!(video_id = %reply.video_id, "video was already processed");
                } else {
                    info!(video_id = %reply.video_id, "video processed");
                }
                self.video_id = Some(reply.video_id);
                self.ingest_status = Some(reply.status);
                self.phase = Phase::Ready;
                Applied::VideoReady
            }
            Outcome::Ingested(Err(error)) => {
                warn!(%error, url = %self.source_url, "video processing failed");
                let classified = classify_ingest_failure(&error);
                self.last_error = Some(classified.clone());
                self.phase = Phase::Idle;
                Applied::Failed(classified)
            }
            Outcome::Answered(Ok(answer)) => {
                debug!(timestamps = answer.timestamps.len(), "answer received");
                self.answer = Some(answer);
                self.phase = Phase::Ready;
                Applied::AnswerReady
            }
            Outcome::Answered(Err(error)) => {
                warn!(%error, "question failed");
                let classified = classify_query_failure(&error);
                self.last_error = Some(classified.clone());
                self.phase = Phase::Ready;
                Applied::Failed(classified)
            }
        }
    }

    /// Returns to an idle session so another video can be ingested.
    ///
    /// Allowed once a video is ready, including while a question is in flight;
    /// that question's result will be discarded. Returns `false` otherwise.
    pub fn reset(&mut self) -> bool {
        if !matches!(self.phase, Phase::Ready | Phase::Querying) {
            return false;
        }

        if let Some(ticket) = self.pending.take() {
            debug!(%ticket, "reset abandons in-flight question");
        }
        self.source_url.clear();
        self.video_id = None;
        self.ingest_status = None;
        self.question.clear();
        self.answer = None;
        self.last_error = None;
        self.phase = Phase::Idle;
        true
    }

    /// Stops waiting for the in-flight request. Its result will be discarded.
    ///
    /// `Submitting` returns to `Idle` and `Querying` returns to `Ready`.
    /// Returns `false` when nothing is in flight.
    pub fn cancel(&mut self) -> bool {
        let next = match self.phase {
            Phase::Submitting => Phase::Idle,
            Phase::Querying => Phase::Ready,
            Phase::Idle | Phase::Ready => return false,
        };
        if let Some(ticket) = self.pending.take() {
            debug!(%ticket, phase = %self.phase, "request cancelled");
        }
        self.phase = next;
        true
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    pub fn video_id(&self) -> Option<&VideoId> {
        self.video_id.as_ref()
    }

    pub fn ingest_status(&self) -> Option<IngestStatus> {
        self.ingest_status
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    pub fn last_error(&self) -> Option<&SessionError> {
        self.last_error.as_ref()
    }

    pub fn pending(&self) -> Option<RequestTicket> {
        self.pending
    }

    /// True while a request is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self.phase, Phase::Submitting | Phase::Querying)
    }

    /// Whether a submit control holding `input` should be enabled.
    pub fn can_submit(&self, input: &str) -> bool {
        self.phase == Phase::Idle && !input.trim().is_empty()
    }

    /// Whether an ask control holding `input` should be enabled.
    pub fn can_ask(&self, input: &str) -> bool {
        self.phase == Phase::Ready && !input.trim().is_empty()
    }

    /// Immutable copy of the user-visible state.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            phase: self.phase,
            source_url: self.source_url.clone(),
            video_id: self.video_id.clone(),
            ingest_status: self.ingest_status,
            question: self.question.clone(),
            answer: self.answer.clone(),
            last_error: self.last_error.clone(),
        }
    }

    fn issue_ticket(&mut self) -> RequestTicket {
        self.issued_tickets += 1;
        let ticket = RequestTicket(self.issued_tickets);
        self.pending = Some(ticket);
        ticket
    }
}

/// Immutable session state consumed by front-ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub phase: Phase,
    pub source_url: String,
    pub video_id: Option<VideoId>,
    pub ingest_status: Option<IngestStatus>,
    pub question: String,
    pub answer: Option<Answer>,
    pub last_error: Option<SessionError>,
}
