use serde::Serialize;

use super::outcome::TurnOutcome;
use crate::chain::{ChainError, ChainOutput};

/// Opening human/assistant pair shown at the top of every conversation.
pub const GREETING: (&str, &str) = ("Who are you?", "Hi! I am GPT-4. How can I help you today?");

/// Fixed start of the prompt context fed to the chain.
pub const PROMPT_PREAMBLE: &str = "The following is a conversation with an AI assistant. The assistant is helpful, creative, clever, and very friendly.\n\nHuman: Hello, who are you?\nAI: I am an AI created by OpenAI. How can I help you today? ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Turn {
    pub human: String,
    pub outcome: TurnOutcome,
    /// The (question, answer) pair exactly as the chain stored it in memory.
    /// `None` when the chain call failed and nothing was stored.
    #[serde(skip)]
    exchange: Option<(String, String)>,
}

impl Turn {
    pub fn record(human: String, result: Result<ChainOutput, ChainError>) -> Self {
        let exchange = result
            .as_ref()
            .ok()
            .map(|output| (output.question.clone(), output.answer.clone()));
        Self {
            human,
            outcome: TurnOutcome::from_chain(result),
            exchange,
        }
    }

    pub fn answer(&self) -> &str {
        self.outcome.display_text()
    }
}

/// The authoritative turn log of one conversation. The visible transcript,
/// the prompt context and the chain memory are all derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    greeting: (String, String),
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            greeting: (GREETING.0.to_string(), GREETING.1.to_string()),
            turns: Vec::new(),
        }
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn push_turn(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// Flat transcript rows: greeting pair first, then one human and one
    /// assistant row per turn.
    pub fn transcript(&self) -> Vec<String> {
        let mut rows = Vec::with_capacity(self.transcript_len());
        rows.push(self.greeting.0.clone());
        rows.push(self.greeting.1.clone());
        for turn in &self.turns {
            rows.push(turn.human.clone());
            rows.push(turn.answer().to_string());
        }
        rows
    }

    pub fn transcript_len(&self) -> usize {
        2 + 2 * self.turns.len()
    }

    /// Index of the final transcript row.
    pub fn last_row(&self) -> usize {
        self.transcript_len() - 1
    }

    /// The running context: preamble plus every recorded exchange.
    pub fn prompt_context(&self) -> String {
        context_through(&self.turns)
    }

    /// The question sent to the chain when `message` is the next turn.
    pub fn prompt_for(&self, message: &str) -> String {
        let mut prompt = self.prompt_context();
        push_human(&mut prompt, message);
        prompt
    }

    /// The (question, answer) pairs the chain stored, in order. Rebuilding
    /// chain memory from these reproduces it byte for byte.
    pub fn memory_exchanges(&self) -> Vec<(String, String)> {
        self.turns
            .iter()
            .filter_map(|turn| turn.exchange.clone())
            .collect()
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

fn context_through(turns: &[Turn]) -> String {
    let mut context = PROMPT_PREAMBLE.to_string();
    for turn in turns {
        push_human(&mut context, &turn.human);
        context.push_str(turn.answer());
    }
    context
}

fn push_human(context: &mut String, message: &str) {
    context.push_str("Human: ");
    context.push_str(message);
    context.push_str("\n\nAI:");
}
