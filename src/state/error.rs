use thiserror::Error;

use crate::core::config::ConfigError;
use crate::llm::LlmError;
use crate::rag::IndexError;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to load vector index: {0}")]
    Index(#[from] IndexError),

    #[error("Failed to initialize LLM client: {0}")]
    Llm(#[from] LlmError),
}
