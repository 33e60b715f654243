//! Error types for lingo-core.

use thiserror::Error;

/// Result type alias using ContentError.
pub type Result<T> = std::result::Result<T, ContentError>;

/// Errors that can occur while loading lesson content.
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("no JSON object found in response")]
    NoJsonObject,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing field `{field}` in {part} part")]
    MissingField { part: &'static str, field: &'static str },

    #[error("unknown explanation part type: {0}")]
    UnknownPart(String),

    #[error("quiz answer {answer:?} is not one of the options")]
    AnswerNotInOptions { answer: String },

    #[error("lesson plan has no explanation parts")]
    EmptyExplanation,
}

/// Errors from the key-value store port.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(String),

    #[error("failed to encode {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors in puzzle definitions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("puzzle solution is empty")]
    Empty,

    #[error("row {row} has {len} cells, expected {size}")]
    NotSquare { row: usize, len: usize, size: usize },
}

/// Errors from the conversation flow and language-model collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChatError {
    #[error("message is empty")]
    EmptyMessage,

    #[error("a reply is already pending")]
    RequestPending,

    #[error("last message must be from the user")]
    LastMessageNotFromUser,

    #[error("language model failure: {0}")]
    Service(String),
}

/// Errors from the speech capture capability.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("speech recognition is not available")]
    Unavailable,

    #[error("already listening for {0:?}")]
    AlreadyListening(String),

    #[error("speech capture failed: {0}")]
    Capture(String),
}
