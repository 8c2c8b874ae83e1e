// src/error.rs
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PostureError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Classifier state lock poisoned")]
    StatePoisoned,

    #[error("Landmark source failed: {0}")]
    Source(String),

    #[error("Cannot open landmark recording {}", path.display())]
    RecordingOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type PostureResult<T> = Result<T, PostureError>;
