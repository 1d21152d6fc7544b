use serde::Serialize;
use tokio::sync::broadcast;

use super::presentation::{ArchiveLabel, TranscriptRow};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// State deltas emitted by the session handlers. The rendering layer
/// subscribes and redraws from these.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    Notification {
        level: NotificationLevel,
        message: String,
    },
    TranscriptAppended {
        rows: Vec<TranscriptRow>,
    },
    TranscriptReplaced {
        rows: Vec<TranscriptRow>,
    },
    ArchiveAppended {
        entry: ArchiveLabel,
    },
    ConversationSelected {
        id: usize,
    },
    SelectionChanged {
        row: usize,
    },
    InputCleared,
}

impl UiEvent {
    pub fn notification(level: NotificationLevel, message: impl Into<String>) -> Self {
        UiEvent::Notification {
            level,
            message: message.into(),
        }
    }
}

#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<UiEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publishes to current subscribers. Having none is not an error.
    pub fn emit(&self, event: UiEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("UI event dropped: no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<UiEvent> {
        self.tx.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
