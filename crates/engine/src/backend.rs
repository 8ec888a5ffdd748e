use qa_http::{
    AskResponse, HealthResponse, ProcessResponse, ProcessStatus, QaClient, QaClientConfig,
    QaHttpError,
};
use tokio::runtime::{Builder, Runtime};

use crate::classify::BackendError;
use crate::dispatch::IngestReply;
use crate::error::{EngineError, Result};
use crate::session::{Answer, IngestStatus, Timestamp, VideoId};

/// Remote operations required by the engine.
pub trait QaBackend {
    /// Submits a video url for ingestion.
    fn ingest(&self, url: &str) -> std::result::Result<IngestReply, BackendError>;

    /// Asks `question` about an ingested video.
    fn ask(
        &self,
        question: &str,
        video_id: &VideoId,
    ) -> std::result::Result<Answer, BackendError>;
}

/// HTTP-backed backend used by production wiring.
///
/// Calls block the current thread on a private current-thread runtime, so this
/// must not be used from inside an async context.
#[derive(Debug)]
pub struct HttpQaBackend {
    client: QaClient,
    runtime: Runtime,
}

impl HttpQaBackend {
    /// Creates a backend talking to the service described by `config`.
    ///
    /// # Example
    /// ```no_run
    /// use engine::HttpQaBackend;
    /// use qa_http::QaClientConfig;
    ///
    /// let _backend = HttpQaBackend::new(QaClientConfig::default()).expect("backend");
    /// ```
    pub fn new(config: QaClientConfig) -> Result<Self> {
        let client = QaClient::new(config)?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| EngineError::BackendSetup {
                context: "build http runtime",
                source,
            })?;
        Ok(Self { client, runtime })
    }

    /// Creates a backend configured from `SEEKTUBE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(QaClientConfig::from_env()?)
    }

    pub fn config(&self) -> &QaClientConfig {
        self.client.config()
    }

    /// Checks that the service is reachable.
    pub fn health(&self) -> Result<HealthResponse> {
        Ok(self.runtime.block_on(self.client.health())?)
    }
}

impl QaBackend for HttpQaBackend {
    fn ingest(&self, url: &str) -> std::result::Result<IngestReply, BackendError> {
        let response = self.runtime.block_on(self.client.process(url))?;
        Ok(response.into())
    }

    fn ask(
        &self,
        question: &str,
        video_id: &VideoId,
    ) -> std::result::Result<Answer, BackendError> {
        let response = self
            .runtime
            .block_on(self.client.ask(question, video_id.as_str()))?;
        Ok(response.into())
    }
}

impl From<QaHttpError> for BackendError {
    fn from(value: QaHttpError) -> Self {
        match value {
            QaHttpError::Api {
                status,
                detail,
                code,
            } => Self::Rejected {
                status: Some(status.as_u16()),
                detail,
                code,
            },
            other => Self::Transport {
                message: other.to_string(),
            },
        }
    }
}

impl From<ProcessStatus> for IngestStatus {
    fn from(value: ProcessStatus) -> Self {
        match value {
            ProcessStatus::Processed => Self::Processed,
            ProcessStatus::AlreadyProcessed => Self::AlreadyProcessed,
        }
    }
}

impl From<ProcessResponse> for IngestReply {
    fn from(value: ProcessResponse) -> Self {
        Self {
            video_id: VideoId::new(value.video_id),
            status: value.status.into(),
        }
    }
}

impl From<AskResponse> for Answer {
    fn from(value: AskResponse) -> Self {
        Self {
            text: value.answer,
            timestamps: value
                .timestamps
                .unwrap_or_default()
                .into_iter()
                .map(|timestamp| Timestamp {
                    start_seconds: timestamp.start_time,
                    url: timestamp.url,
                })
                .collect(),
        }
    }
}
