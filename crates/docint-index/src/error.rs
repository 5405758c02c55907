//! Index error types.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No index generation at {0}")]
    NotFound(PathBuf),

    #[error("Index artifacts are inconsistent: {0}")]
    Inconsistent(String),

    #[error("Invalid build input: {0}")]
    InvalidInput(String),
}

pub type IndexResult<T> = Result<T, IndexError>;
