use engine::{IngestStatus, RenderedAnswer, SessionError, VideoId, describe_source};
use qa_http::HealthResponse;
use serde_json::json;

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl Format {
    pub fn from_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

fn status_label(status: IngestStatus) -> &'static str {
    match status {
        IngestStatus::Processed => "processed",
        IngestStatus::AlreadyProcessed => "already processed",
    }
}

pub fn ready(
    format: Format,
    source_url: &str,
    video_id: &VideoId,
    status: Option<IngestStatus>,
) -> String {
    match format {
        Format::Text => {
            let mut line = format!("Video ready: {video_id}");
            if let Some(status) = status {
                line.push_str(&format!(" ({})", status_label(status)));
            }
            line.push_str(&format!("\n  {}", describe_source(source_url)));
            line
        }
        Format::Json => json!({
            "video_id": video_id,
            "status": status,
            "source_url": source_url,
        })
        .to_string(),
    }
}

pub fn answer(format: Format, question: &str, rendered: &RenderedAnswer) -> String {
    match format {
        Format::Text => format!("Q: {question}\n{rendered}"),
        Format::Json => json!({
            "question": question,
            "answer": rendered,
        })
        .to_string(),
    }
}

pub fn failure(format: Format, question: &str, error: &SessionError) -> String {
    match format {
        Format::Text => format!("Q: {question}\n  error: {}", error.message),
        Format::Json => json!({
            "question": question,
            "error": error,
        })
        .to_string(),
    }
}

/// JSON record of a failed ingestion; text mode reports it on stderr instead.
pub fn ingest_failure(source_url: &str, error: &SessionError) -> String {
    json!({
        "source_url": source_url,
        "error": error,
    })
    .to_string()
}

pub fn health(format: Format, health: &HealthResponse) -> String {
    match format {
        Format::Text => match health.message.as_deref() {
            Some(message) => format!("{}: {message}", health.status),
            None => health.status.clone(),
        },
        Format::Json => json!(health).to_string(),
    }
}
