/// Error types shared across the gallery
///
/// Nothing here is fatal to the process: every caller either degrades to a
/// placeholder/empty label or logs and moves on.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("file is not readable: {}", .0.display())]
    NotReadable(PathBuf),

    #[error("background task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for Error {
    fn from(err: tokio::task::JoinError) -> Self {
        Error::Task(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
