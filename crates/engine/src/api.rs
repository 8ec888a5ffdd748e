use tracing::{debug, info};

use crate::backend::QaBackend;
use crate::classify::SessionError;
use crate::dispatch::{Completion, execute};
use crate::error::{EngineError, Result};
use crate::render::{RenderedAnswer, render};
use crate::session::{Applied, Phase, RequestTicket, Session, SessionSnapshot};

/// Commands accepted by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ingests a video url. Whitespace-only urls are ignored.
    ///
    /// # Example
    /// ```ignore
    /// use engine::{Command, Engine, HttpQaBackend};
    ///
    /// let mut engine = Engine::new(HttpQaBackend::from_env()?);
    /// let _ = engine.handle_command(Command::Submit {
    ///     url: "https://youtu.be/abc123".to_owned(),
    /// });
    /// ```
    Submit {
        url: String,
    },
    /// Asks a question about the ready video. Whitespace-only questions are
    /// ignored.
    Ask {
        question: String,
    },
    Reset,
    Cancel,
}

/// Events emitted by the engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    SessionChanged(SessionSnapshot),
    AnswerReady(RenderedAnswer),
    Error(SessionError),
    StaleResponseDiscarded { ticket: RequestTicket },
}

/// Synchronous driver that runs session requests against a backend.
///
/// Every command runs to completion before `handle_command` returns, so the
/// engine never observes an in-flight request between commands.
#[derive(Debug)]
pub struct Engine<B> {
    backend: B,
    session: Session,
}

impl<B> Engine<B>
where
    B: QaBackend,
{
    /// Creates an engine with an idle session.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            session: Session::new(),
        }
    }

    /// Applies one command and returns emitted events.
    ///
    /// Service failures are reported as [`Event::Error`], never as `Err`.
    pub fn handle_command(&mut self, command: Command) -> Result<Vec<Event>> {
        match command {
            Command::Submit { url } => self.submit(&url),
            Command::Ask { question } => self.ask(&question),
            Command::Reset => self.reset(),
            Command::Cancel => Ok(self.cancel()),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn submit(&mut self, url: &str) -> Result<Vec<Event>> {
        if url.trim().is_empty() {
            debug!("ignoring empty video url");
            return Ok(Vec::new());
        }
        if let Some(video_id) = self.session.video_id() {
            return Err(EngineError::VideoAlreadyLoaded {
                video_id: video_id.clone(),
            });
        }
        if self.session.is_busy() {
            return Err(EngineError::RequestInFlight {
                phase: self.session.phase(),
            });
        }

        let Some(request) = self.session.submit(url) else {
            debug!("ignoring empty video url");
            return Ok(Vec::new());
        };

        let mut events = vec![Event::SessionChanged(self.session.snapshot())];
        let completion = execute(&self.backend, request);
        events.extend(self.apply(completion));
        Ok(events)
    }

    fn ask(&mut self, question: &str) -> Result<Vec<Event>> {
        if question.trim().is_empty() {
            debug!("ignoring empty question");
            return Ok(Vec::new());
        }
        match self.session.phase() {
            Phase::Ready => {}
            Phase::Querying => {
                return Err(EngineError::RequestInFlight {
                    phase: Phase::Querying,
                });
            }
            phase @ (Phase::Idle | Phase::Submitting) => {
                return Err(EngineError::VideoNotReady { phase });
            }
        }

        let Some(request) = self.session.ask(question) else {
            debug!("ignoring empty question");
            return Ok(Vec::new());
        };

        let mut events = vec![Event::SessionChanged(self.session.snapshot())];
        let completion = execute(&self.backend, request);
        events.extend(self.apply(completion));
        Ok(events)
    }

    fn reset(&mut self) -> Result<Vec<Event>> {
        let phase = self.session.phase();
        if !self.session.reset() {
            return Err(EngineError::ResetNotAllowed { phase });
        }
        info!("session reset");
        Ok(vec![Event::SessionChanged(self.session.snapshot())])
    }

    fn cancel(&mut self) -> Vec<Event> {
        if self.session.cancel() {
            vec![Event::SessionChanged(self.session.snapshot())]
        } else {
            Vec::new()
        }
    }

    fn apply(&mut self, completion: Completion) -> Vec<Event> {
        let ticket = completion.ticket;
        match self.session.apply(completion) {
            Applied::Stale => vec![Event::StaleResponseDiscarded { ticket }],
            Applied::VideoReady => vec![Event::SessionChanged(self.session.snapshot())],
            Applied::AnswerReady => {
                let mut events = vec![Event::SessionChanged(self.session.snapshot())];
                if let Some(answer) = self.session.answer() {
                    events.push(Event::AnswerReady(render(answer)));
                }
                events
            }
            Applied::Failed(error) => vec![
                Event::SessionChanged(self.session.snapshot()),
                Event::Error(error),
            ],
        }
    }
}
