pub mod error;
pub mod openai;
pub mod provider;
pub mod types;

pub use error::LlmError;
pub use openai::OpenAiProvider;
pub use provider::LlmProvider;
pub use types::{ChatMessage, ChatRequest};
