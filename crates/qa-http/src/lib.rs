//! HTTP client for the video ingestion and question-answering service.

mod client;
mod config;
mod error;
mod models;

pub use client::QaClient;
pub use config::{BASE_URL_ENV, DEFAULT_BASE_URL, QaClientConfig, TIMEOUT_ENV};
pub use error::{QaHttpError, Result};
pub use models::{
    AskRequest, AskResponse, ErrorBody, HealthResponse, ProcessRequest, ProcessResponse,
    ProcessStatus, TimestampDto,
};
pub use reqwest::StatusCode;
