//! Application state of the chat page and the handlers that mutate it.
//!
//! `ChatSession` owns the live conversation, the archive of past
//! conversations, the pending input, the selection pointers and the chain.
//! Each handler runs to completion and reports what changed through the
//! [`EventBus`].
//!
//! Two locks: the chain lock serializes handlers, the state lock guards what
//! the page renders. The state lock is never held across a chain call, so
//! snapshots stay available while a message is in flight. Lock order is
//! always chain, then state.

mod conversation;
mod events;
mod outcome;
mod presentation;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::chain::ConversationChain;

pub use conversation::{Conversation, Turn, GREETING, PROMPT_PREAMBLE};
pub use events::{EventBus, NotificationLevel, UiEvent};
pub use outcome::{FailureKind, TurnOutcome, EMPTY_ANSWER, ERROR_ANSWER};
pub use presentation::{
    archive_label, row_style, transcript_rows, ArchiveEntry, ArchiveLabel, RowStyle,
    TranscriptRow,
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no archived conversation with id {0}")]
    UnknownConversation(usize),
}

/// Everything the page needs to render from scratch.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub transcript: Vec<TranscriptRow>,
    pub archive: Vec<ArchiveLabel>,
    pub pending_message: String,
    pub selected_row: usize,
    pub selected_conversation: Option<usize>,
}

struct SessionState {
    conversation: Conversation,
    archive: Vec<ArchiveEntry>,
    pending_message: String,
    selected_row: usize,
    selected_conversation: Option<usize>,
}

impl SessionState {
    fn new() -> Self {
        let conversation = Conversation::new();
        let selected_row = conversation.last_row();
        Self {
            conversation,
            archive: Vec::new(),
            pending_message: String::new(),
            selected_row,
            selected_conversation: None,
        }
    }
}

pub struct ChatSession {
    state: Mutex<SessionState>,
    chain: Mutex<Box<dyn ConversationChain>>,
    events: EventBus,
}

impl ChatSession {
    pub fn new(chain: Box<dyn ConversationChain>, events: EventBus) -> Self {
        Self {
            state: Mutex::new(SessionState::new()),
            chain: Mutex::new(chain),
            events,
        }
    }

    pub async fn conversation(&self) -> Conversation {
        self.state.lock().await.conversation.clone()
    }

    pub async fn archive(&self) -> Vec<ArchiveEntry> {
        self.state.lock().await.archive.clone()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            transcript: transcript_rows(&state.conversation),
            archive: state.archive.iter().map(archive_label).collect(),
            pending_message: state.pending_message.clone(),
            selected_row: state.selected_row,
            selected_conversation: state.selected_conversation,
        }
    }

    /// Sends `message` through the chain and records the turn.
    ///
    /// A failed chain call is recorded with the `"Error"` sentinel and the
    /// conversation carries on.
    pub async fn send_message(&self, message: impl Into<String>) -> TurnOutcome {
        let mut chain = self.chain.lock().await;

        let message = message.into();
        let question = {
            let mut state = self.state.lock().await;
            state.pending_message = message.clone();
            state.conversation.prompt_for(&message)
        };
        self.notify(NotificationLevel::Info, "Sending message...");

        let result = chain.call(&question).await;
        if let Err(err) = &result {
            tracing::error!("Chain invocation failed: {}", err);
        }
        let turn = Turn::record(message, result);
        let outcome = turn.outcome.clone();
        tracing::info!("Response received: {}", outcome.display_text());

        let mut state = self.state.lock().await;
        let human_row = state.conversation.transcript_len();
        state.conversation.push_turn(turn);
        state.selected_row = human_row + 1;
        state.pending_message.clear();

        let rows = transcript_rows(&state.conversation)
            .into_iter()
            .skip(human_row)
            .collect();
        self.events.emit(UiEvent::TranscriptAppended { rows });
        self.events.emit(UiEvent::SelectionChanged {
            row: state.selected_row,
        });
        self.events.emit(UiEvent::InputCleared);

        match &outcome {
            TurnOutcome::Failed { kind, .. } => self.notify(
                NotificationLevel::Warning,
                format!("Response failed ({:?}); recorded as \"{}\"", kind, ERROR_ANSWER),
            ),
            _ => self.notify(NotificationLevel::Success, "Response received!"),
        }

        outcome
    }

    /// Archives the live conversation and starts a fresh one from the
    /// greeting. The chain forgets everything.
    pub async fn reset(&self) -> ArchiveLabel {
        let mut chain = self.chain.lock().await;
        let mut state = self.state.lock().await;

        let id = state.archive.len();
        let previous = std::mem::replace(&mut state.conversation, Conversation::new());
        let entry = ArchiveEntry {
            id,
            conversation: previous,
        };
        let label = archive_label(&entry);
        state.archive.push(entry);

        chain.clear_memory();
        state.selected_row = state.conversation.last_row();
        state.selected_conversation = None;
        tracing::info!("Chat reset. {} past conversations", state.archive.len());

        self.events.emit(UiEvent::ArchiveAppended {
            entry: label.clone(),
        });
        self.events.emit(UiEvent::TranscriptReplaced {
            rows: transcript_rows(&state.conversation),
        });
        self.events.emit(UiEvent::SelectionChanged {
            row: state.selected_row,
        });

        label
    }

    /// Makes a copy of an archived conversation live and rebuilds the chain
    /// memory from it. The archive itself is left untouched.
    pub async fn select_conversation(&self, id: usize) -> Result<(), SessionError> {
        let mut chain = self.chain.lock().await;
        let mut state = self.state.lock().await;

        let conversation = state
            .archive
            .get(id)
            .map(|entry| entry.conversation.clone())
            .ok_or(SessionError::UnknownConversation(id))?;

        chain.restore_memory(conversation.memory_exchanges());
        state.selected_row = conversation.last_row();
        state.selected_conversation = Some(id);
        state.conversation = conversation;
        tracing::info!("Conversation {} selected", id);

        self.events.emit(UiEvent::ConversationSelected { id });
        self.events.emit(UiEvent::TranscriptReplaced {
            rows: transcript_rows(&state.conversation),
        });
        self.events.emit(UiEvent::SelectionChanged {
            row: state.selected_row,
        });

        Ok(())
    }

    fn notify(&self, level: NotificationLevel, message: impl Into<String>) {
        self.events.emit(UiEvent::notification(level, message));
    }
}
