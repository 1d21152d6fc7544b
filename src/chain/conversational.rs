use std::sync::Arc;

use async_trait::async_trait;

use super::memory::ConversationBufferMemory;
use super::prompts::{condense_question_prompt, qa_system_prompt};
use super::{ChainError, ChainOutput, ConversationChain};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::rag::{RAGContextBuilder, Retriever};

/// Retriever + memory + LLM.
///
/// With prior turns in memory, the follow-up question is first condensed into
/// a standalone question; documents are then retrieved for it and stuffed into
/// the answer prompt.
pub struct ConversationalRetrievalChain {
    llm: Arc<dyn LlmProvider>,
    retriever: Retriever,
    memory: ConversationBufferMemory,
    context_builder: RAGContextBuilder,
}

impl ConversationalRetrievalChain {
    pub fn from_llm(llm: Arc<dyn LlmProvider>, retriever: Retriever) -> Self {
        tracing::info!(
            "Creating conversation chain (provider: {}, top_k: {})",
            llm.name(),
            retriever.top_k()
        );
        Self {
            llm,
            retriever,
            memory: ConversationBufferMemory::new(),
            context_builder: RAGContextBuilder::default(),
        }
    }

    async fn standalone_question(
        &self,
        question: &str,
        history: &[ChatMessage],
    ) -> Result<String, ChainError> {
        if history.is_empty() {
            return Ok(question.to_string());
        }

        let prompt = condense_question_prompt(history, question);
        let condensed = self
            .llm
            .chat(ChatRequest::new(vec![ChatMessage::user(prompt)]))
            .await?;
        Ok(condensed.trim().to_string())
    }
}

#[async_trait]
impl ConversationChain for ConversationalRetrievalChain {
    async fn call(&mut self, question: &str) -> Result<ChainOutput, ChainError> {
        let history = self.memory.messages();
        let standalone = self.standalone_question(question, &history).await?;

        let documents = self.retriever.retrieve(&standalone).await?;
        let context = self.context_builder.build_context(&documents);

        let answer = self
            .llm
            .chat(ChatRequest::new(vec![
                ChatMessage::system(qa_system_prompt(&context)),
                ChatMessage::user(standalone.as_str()),
            ]))
            .await?;

        self.memory.save_context(question, &answer);
        tracing::debug!("Chain memory holds {} exchanges", self.memory.len());

        Ok(ChainOutput {
            question: question.to_string(),
            answer,
            chat_history: self.memory.messages(),
            source_documents: documents,
        })
    }

    fn clear_memory(&mut self) {
        self.memory.clear();
    }

    fn restore_memory(&mut self, exchanges: Vec<(String, String)>) {
        self.memory.replace(exchanges);
    }
}
