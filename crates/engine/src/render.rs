use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::session::Answer;
use crate::time::format_timestamp;

/// Answer text the service returns when the transcript has nothing relevant.
pub const NOT_FOUND_ANSWER: &str = "The video does not mention this.";

const FALLBACK_SOURCE_LABEL: &str = "YouTube Video";
const WATCH_MARKER: &str = "youtube.com/watch?v=";
const SHORT_MARKER: &str = "youtu.be/";

/// How the answer text should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerTone {
    Normal,
    NotFound,
}

/// Where a source link should open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    NewContext,
}

/// One clickable timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceLink {
    pub label: String,
    pub url: String,
    pub target: LinkTarget,
}

/// Display model of an [`Answer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedAnswer {
    pub text: String,
    pub tone: AnswerTone,
    pub sources: Vec<SourceLink>,
}

impl RenderedAnswer {
    pub fn is_not_found(&self) -> bool {
        self.tone == AnswerTone::NotFound
    }
}

impl Display for RenderedAnswer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Answer")?;
        if self.is_not_found() {
            writeln!(f, "  [not found] {}", self.text)?;
        } else {
            writeln!(f, "  {}", self.text)?;
        }

        if !self.sources.is_empty() {
            writeln!(f)?;
            writeln!(f, "Sources")?;
            for link in &self.sources {
                writeln!(f, "  \u{25b6} {}  {} \u{2197}", link.label, link.url)?;
            }
        }
        Ok(())
    }
}

/// Maps an answer to its display model.
///
/// The text is kept verbatim; only an exact match of [`NOT_FOUND_ANSWER`]
/// changes the tone. Sources keep the service order.
///
/// # Example
/// ```
/// use engine::{Answer, Timestamp, render};
///
/// let rendered = render(&Answer {
///     text: "X happens".to_owned(),
///     timestamps: vec![Timestamp {
///         start_seconds: 125.0,
///         url: "https://youtu.be/abc123?t=125".to_owned(),
///     }],
/// });
/// assert_eq!(rendered.sources[0].label, "2:05");
/// ```
pub fn render(answer: &Answer) -> RenderedAnswer {
    let tone = if answer.text == NOT_FOUND_ANSWER {
        AnswerTone::NotFound
    } else {
        AnswerTone::Normal
    };

    RenderedAnswer {
        text: answer.text.clone(),
        tone,
        sources: answer
            .timestamps
            .iter()
            .map(|timestamp| SourceLink {
                label: format_timestamp(timestamp.start_seconds),
                url: timestamp.url.clone(),
                target: LinkTarget::NewContext,
            })
            .collect(),
    }
}

/// Short label for the video behind `url`, e.g. `Video abc123`.
pub fn describe_source(url: &str) -> String {
    match youtube_id(url) {
        Some(id) => format!("Video {id}"),
        None => FALLBACK_SOURCE_LABEL.to_owned(),
    }
}

fn youtube_id(url: &str) -> Option<&str> {
    let start = [WATCH_MARKER, SHORT_MARKER]
        .iter()
        .filter_map(|marker| url.find(marker).map(|at| at + marker.len()))
        .min()?;
    let rest = &url[start..];
    let end = rest
        .find(|c: char| matches!(c, '&' | '\n' | '?' | '#'))
        .unwrap_or(rest.len());
    let id = &rest[..end];
    (!id.is_empty()).then_some(id)
}
