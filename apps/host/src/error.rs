//! Host error types.

use lingo_core::{ContentError, StorageError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HostError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("model error: {status} - {message}")]
    Model { status: u16, message: String },

    #[error("model returned no text")]
    EmptyReply,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Content(#[from] ContentError),
}

pub type Result<T> = std::result::Result<T, HostError>;
