//! Conversational question answering over the retriever.

mod conversational;
mod memory;
mod prompts;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::llm::{ChatMessage, LlmError};
use crate::rag::{RetrievalError, RetrievedDocument};

pub use conversational::ConversationalRetrievalChain;
pub use memory::ConversationBufferMemory;
pub use prompts::{condense_question_prompt, format_chat_history, qa_system_prompt};

#[derive(Debug, Error)]
pub enum ChainError {
    #[error("retrieval failed: {0}")]
    Retrieval(#[from] RetrievalError),

    #[error("completion failed: {0}")]
    Completion(#[from] LlmError),
}

/// Result of one chain call.
#[derive(Debug, Clone, Serialize)]
pub struct ChainOutput {
    pub question: String,
    pub answer: String,
    /// Full memory after the call; the last entry is this call's answer.
    pub chat_history: Vec<ChatMessage>,
    pub source_documents: Vec<RetrievedDocument>,
}

/// Stateful question answering pipeline. Every successful `call` appends the
/// exchange to the chain's memory, so callers must not call it speculatively.
#[async_trait]
pub trait ConversationChain: Send + Sync {
    async fn call(&mut self, question: &str) -> Result<ChainOutput, ChainError>;

    fn clear_memory(&mut self);

    /// Replaces memory with the given (question, answer) exchanges.
    fn restore_memory(&mut self, exchanges: Vec<(String, String)>);
}
