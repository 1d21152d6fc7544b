use async_trait::async_trait;

use super::error::LlmError;
use super::types::ChatRequest;

/// Hosted model endpoint: chat completion plus text embeddings.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "openai")
    fn name(&self) -> &str;

    /// chat completion (non-streaming), returns the assistant message content
    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError>;

    /// generate one embedding per input, in input order
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;
}
