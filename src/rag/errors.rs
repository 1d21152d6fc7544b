use std::path::PathBuf;

use thiserror::Error;

use crate::llm::LlmError;

/// Failures while loading or querying the persisted vector index.
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("vector index not found at {0}")]
    NotFound(PathBuf),

    #[error("failed to read vector index {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse vector index {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("vector index is invalid: {0}")]
    Invalid(String),

    #[error("vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

/// Failures while turning a query into retrieved documents.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to embed query: {0}")]
    Embedding(#[from] LlmError),

    #[error("embedding provider returned no vector for the query")]
    EmptyEmbedding,

    #[error(transparent)]
    Index(#[from] IndexError),
}
