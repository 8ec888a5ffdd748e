use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessRequest {
    pub url: String,
}

/// Ingestion status reported by `POST /process`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Processed,
    AlreadyProcessed,
}

/// Response of `POST /process`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessResponse {
    pub video_id: String,
    pub status: ProcessStatus,
}

/// Body of `POST /ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AskRequest {
    pub question: String,
    pub video_id: String,
}

/// One timestamp returned with an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampDto {
    pub start_time: f64,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<f64>,
}

/// Response of `POST /ask`. `timestamps` may be missing or null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    #[serde(default)]
    pub timestamps: Option<Vec<TimestampDto>>,
}

/// Response of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error payload attached to non-success responses.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<Value>,
    #[serde(default)]
    pub code: Option<String>,
}

impl ErrorBody {
    /// Parses an error body, returning an empty payload for non-JSON text.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    /// Returns `detail` as text.
    ///
    /// Strings are returned as-is; structured details (such as validation
    /// error lists) are returned as compact JSON.
    pub fn detail_text(&self) -> Option<String> {
        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AskResponse, ErrorBody, ProcessResponse, ProcessStatus};

    #[test]
    fn process_response_reads_both_statuses() {
        let processed: ProcessResponse =
            serde_json::from_str(r#"{"video_id":"abc123","status":"processed"}"#)
                .expect("processed");
        let cached: ProcessResponse =
            serde_json::from_str(r#"{"video_id":"abc123","status":"already_processed"}"#)
                .expect("already processed");

        assert_eq!(processed.status, ProcessStatus::Processed);
        assert_eq!(cached.status, ProcessStatus::AlreadyProcessed);
    }

    #[test]
    fn ask_response_accepts_missing_or_null_timestamps() {
        let missing: AskResponse =
            serde_json::from_str(r#"{"answer":"X"}"#).expect("missing timestamps");
        let null: AskResponse =
            serde_json::from_str(r#"{"answer":"X","timestamps":null}"#).expect("null timestamps");

        assert_eq!(missing.timestamps, None);
        assert_eq!(null.timestamps, None);
    }

    #[test]
    fn ask_response_keeps_extra_timestamp_fields() {
        let response: AskResponse = serde_json::from_str(
            r#"{"answer":"X","timestamps":[{"video_id":"abc","start_time":42,"end_time":50,"url":"https://www.youtube.com/watch?v=abc&t=42s"}]}"#,
        )
        .expect("timestamps");

        let timestamps = response.timestamps.expect("present");
        assert_eq!(timestamps[0].start_time, 42.0);
        assert_eq!(timestamps[0].video_id.as_deref(), Some("abc"));
        assert_eq!(timestamps[0].end_time, Some(50.0));
    }

    #[test]
    fn error_body_detail_text_handles_strings_and_structures() {
        let text = ErrorBody::parse(r#"{"detail":"Invalid URL format"}"#);
        assert_eq!(text.detail_text().as_deref(), Some("Invalid URL format"));

        let list = ErrorBody::parse(r#"{"detail":[{"loc":["body","url"],"msg":"field required"}]}"#);
        assert_eq!(
            list.detail_text().as_deref(),
            Some(r#"[{"loc":["body","url"],"msg":"field required"}]"#)
        );

        let coded = ErrorBody::parse(r#"{"detail":null,"code":"subtitles_unavailable"}"#);
        assert_eq!(coded.detail_text(), None);
        assert_eq!(coded.code.as_deref(), Some("subtitles_unavailable"));
    }

    #[test]
    fn error_body_tolerates_non_json_text() {
        let body = ErrorBody::parse("Internal Server Error");

        assert_eq!(body, ErrorBody::default());
        assert_eq!(body.detail_text(), None);
    }
}
