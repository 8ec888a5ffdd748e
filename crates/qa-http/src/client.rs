use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::QaClientConfig;
use crate::error::{QaHttpError, Result};
use crate::models::{
    AskRequest, AskResponse, ErrorBody, HealthResponse, ProcessRequest, ProcessResponse,
};

/// Client for the `/process`, `/ask` and `/health` endpoints.
///
/// No retries are attempted; every failure is returned to the caller.
#[derive(Debug, Clone)]
pub struct QaClient {
    client: Client,
    config: QaClientConfig,
}

impl QaClient {
    pub fn new(config: QaClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &QaClientConfig {
        &self.config
    }

    /// Submits a video url for ingestion.
    pub async fn process(&self, url: &str) -> Result<ProcessResponse> {
        let endpoint = self.config.endpoint("process");
        debug!(%endpoint, url, "submitting video");

        let response = self
            .client
            .post(&endpoint)
            .json(&ProcessRequest {
                url: url.to_owned(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    /// Asks `question` about an ingested video.
    pub async fn ask(&self, question: &str, video_id: &str) -> Result<AskResponse> {
        let endpoint = self.config.endpoint("ask");
        debug!(%endpoint, video_id, "asking question");

        let response = self
            .client
            .post(&endpoint)
            .json(&AskRequest {
                question: question.to_owned(),
                video_id: video_id.to_owned(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    /// Reads the service health endpoint.
    pub async fn health(&self) -> Result<HealthResponse> {
        let endpoint = self.config.endpoint("health");
        let response = self.client.get(&endpoint).send().await?;
        read_json(response).await
    }
}

async fn read_json<T>(response: Response) -> Result<T>
where
    T: DeserializeOwned,
{
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let body = response.text().await.unwrap_or_default();
    let payload = ErrorBody::parse(&body);
    let detail = payload.detail_text();
    warn!(
        status = status.as_u16(),
        detail = detail.as_deref().unwrap_or(""),
        "service returned error"
    );

    Err(QaHttpError::Api {
        status,
        detail,
        code: payload.code,
    })
}
