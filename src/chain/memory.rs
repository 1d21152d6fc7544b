use crate::llm::ChatMessage;

/// Unbounded buffer of every (question, answer) exchange the chain has seen.
#[derive(Debug, Clone, Default)]
pub struct ConversationBufferMemory {
    exchanges: Vec<(String, String)>,
}

impl ConversationBufferMemory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn save_context(&mut self, question: &str, answer: &str) {
        self.exchanges
            .push((question.to_string(), answer.to_string()));
    }

    /// History as alternating user/assistant messages, oldest first.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.exchanges
            .iter()
            .flat_map(|(question, answer)| {
                [ChatMessage::user(question), ChatMessage::assistant(answer)]
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.exchanges.clear();
    }

    pub fn replace(&mut self, exchanges: Vec<(String, String)>) {
        self.exchanges = exchanges;
    }

    pub fn len(&self) -> usize {
        self.exchanges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exchanges.is_empty()
    }
}
