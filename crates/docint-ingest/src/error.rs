//! Ingestion error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Extraction error: {0}")]
    Extract(#[from] docint_extract::ExtractError),
}

pub type IngestResult<T> = Result<T, IngestError>;
