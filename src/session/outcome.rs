use serde::Serialize;

use crate::chain::{ChainError, ChainOutput};
use crate::llm::LlmError;

/// Transcript text shown for a turn whose chain call failed.
pub const ERROR_ANSWER: &str = "Error";
/// Transcript text shown when the chain returned no history to answer from.
pub const EMPTY_ANSWER: &str = "No response";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Embedding or index lookup failed.
    Retrieval,
    /// The provider rejected the credential.
    Auth,
    /// The provider answered with an error status or an unusable payload.
    Provider,
    /// The request never got a response.
    Transport,
}

/// How one send-message turn ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TurnOutcome {
    /// Answer with line breaks removed.
    Answered { answer: String },
    /// The chain ran but produced nothing to show.
    Declined,
    Failed { kind: FailureKind, message: String },
}

impl TurnOutcome {
    pub fn from_chain(result: Result<ChainOutput, ChainError>) -> Self {
        match result {
            Ok(output) => match output.chat_history.last() {
                Some(last) => TurnOutcome::Answered {
                    answer: last.content.replace('\n', ""),
                },
                None => TurnOutcome::Declined,
            },
            Err(err) => TurnOutcome::Failed {
                kind: classify(&err),
                message: err.to_string(),
            },
        }
    }

    /// Text recorded in the transcript and the prompt context.
    pub fn display_text(&self) -> &str {
        match self {
            TurnOutcome::Answered { answer } => answer,
            TurnOutcome::Declined => EMPTY_ANSWER,
            TurnOutcome::Failed { .. } => ERROR_ANSWER,
        }
    }
}

fn classify(err: &ChainError) -> FailureKind {
    match err {
        ChainError::Retrieval(_) => FailureKind::Retrieval,
        ChainError::Completion(llm) if llm.is_auth() => FailureKind::Auth,
        ChainError::Completion(LlmError::Transport { .. }) => FailureKind::Transport,
        ChainError::Completion(_) => FailureKind::Provider,
    }
}
