use serde::Serialize;

use super::conversation::Conversation;

const LABEL_PREVIEW_CHARS: usize = 50;
const EMPTY_LABEL: &str = "Empty conversation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowStyle {
    UserMessage,
    GptMessage,
}

/// Even rows are human messages, odd rows assistant messages.
pub fn row_style(index: usize) -> RowStyle {
    if index % 2 == 0 {
        RowStyle::UserMessage
    } else {
        RowStyle::GptMessage
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptRow {
    pub index: usize,
    pub text: String,
    pub style: RowStyle,
}

pub fn transcript_rows(conversation: &Conversation) -> Vec<TranscriptRow> {
    conversation
        .transcript()
        .into_iter()
        .enumerate()
        .map(|(index, text)| TranscriptRow {
            index,
            text,
            style: row_style(index),
        })
        .collect()
}

/// A conversation archived by a reset. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveEntry {
    pub id: usize,
    pub conversation: Conversation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveLabel {
    pub id: usize,
    pub label: String,
}

/// Tree label for an archived conversation: a preview of its first answer,
/// or "Empty conversation" when nothing beyond the greeting was said.
pub fn archive_label(entry: &ArchiveEntry) -> ArchiveLabel {
    let label = match entry.conversation.turns().first() {
        Some(turn) => {
            let preview: String = turn.answer().chars().take(LABEL_PREVIEW_CHARS).collect();
            format!("{}...", preview)
        }
        None => EMPTY_LABEL.to_string(),
    };

    ArchiveLabel {
        id: entry.id,
        label,
    }
}
