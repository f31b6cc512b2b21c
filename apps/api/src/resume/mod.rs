// Resume parsing pipeline: duplicate guard, extraction, prompt, completion,
// response parsing, persistence. The upload route in `handlers` is the only caller.

pub mod handlers;
pub mod ledger;
pub mod persistence;
pub mod pipeline;
pub mod prompts;
pub mod response;
pub mod upload;

use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Everything that can abort a pipeline run. None of these are recovered locally.
#[derive(Debug, Error)]
pub enum ResumeError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Text extraction failed: {0}")]
    Extraction(ExtractionError),

    #[error("Completion failed: {0}")]
    Completion(#[from] LlmError),

    #[error("Invalid response format: {0}")]
    InvalidResponseFormat(String),

    #[error("Unsupported format: {0}")]
    UnsupportedOutputFormat(String),

    #[error("Filesystem error: {0}")]
    Filesystem(#[from] std::io::Error),

    #[error("Ledger write failed: {0}")]
    Ledger(#[from] csv::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<ExtractionError> for ResumeError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFileType(ext) => ResumeError::UnsupportedFileType(ext),
            other => ResumeError::Extraction(other),
        }
    }
}
