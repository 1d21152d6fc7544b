//! Builds the context block stuffed into the answer prompt from retrieved
//! documents.

use super::retriever::RetrievedDocument;

const DEFAULT_MAX_CONTEXT_CHARS: usize = 12_000;

#[derive(Debug, Clone)]
pub struct RAGContextBuilder {
    /// Maximum total context length in characters
    max_context_length: usize,
}

impl Default for RAGContextBuilder {
    fn default() -> Self {
        Self {
            max_context_length: DEFAULT_MAX_CONTEXT_CHARS,
        }
    }
}

impl RAGContextBuilder {
    /// Joins documents in retrieval order, separated by blank lines, stopping
    /// before the configured length would be exceeded.
    pub fn build_context(&self, documents: &[RetrievedDocument]) -> String {
        let mut context = String::new();
        let mut current_length = 0;

        for doc in documents {
            let addition_length = doc.content.chars().count() + 2;
            if current_length + addition_length > self.max_context_length {
                break;
            }

            context.push_str(&doc.content);
            context.push_str("\n\n");
            current_length += addition_length;
        }

        context.trim().to_string()
    }
}
