//! In-process fakes shared by unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use crate::chain::{ChainError, ChainOutput, ConversationChain};
use crate::llm::{ChatMessage, ChatRequest, LlmError, LlmProvider};

/// LLM double: replays queued chat replies and returns a fixed embedding.
pub struct ScriptedLlm {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    embedding: Vec<f32>,
    fail_embeddings: bool,
    chat_requests: Mutex<Vec<ChatRequest>>,
    embedded: Mutex<Vec<String>>,
}

impl ScriptedLlm {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            embedding: vec![1.0, 0.0],
            fail_embeddings: false,
            chat_requests: Mutex::new(Vec::new()),
            embedded: Mutex::new(Vec::new()),
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = embedding;
        self
    }

    pub fn failing_embeddings(mut self) -> Self {
        self.fail_embeddings = true;
        self
    }

    pub fn reply(self, content: &str) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(content.to_string()));
        self
    }

    pub fn fail_with_status(self, status: u16) -> Self {
        self.replies.lock().unwrap().push_back(Err(LlmError::Status {
            provider: "scripted".to_string(),
            status,
            body: "scripted failure".to_string(),
        }));
        self
    }

    pub fn chat_requests(&self) -> Vec<ChatRequest> {
        self.chat_requests.lock().unwrap().clone()
    }

    pub fn embedded_inputs(&self) -> Vec<String> {
        self.embedded.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError> {
        self.chat_requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(LlmError::Transport {
                    provider: "scripted".to_string(),
                    message: "no scripted reply left".to_string(),
                })
            })
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        self.embedded.lock().unwrap().extend(inputs.iter().cloned());
        if self.fail_embeddings {
            return Err(LlmError::Transport {
                provider: "scripted".to_string(),
                message: "embedding service unreachable".to_string(),
            });
        }
        Ok(inputs.iter().map(|_| self.embedding.clone()).collect())
    }
}

/// What a [`ScriptedChain`] was asked to do.
#[derive(Debug, Default)]
pub struct ChainLog {
    pub questions: Vec<String>,
    pub clears: usize,
    pub restored: Vec<Vec<(String, String)>>,
}

/// Chain double: answers from a queue, echoes the memory it would hold.
pub struct ScriptedChain {
    answers: VecDeque<Result<String, LlmError>>,
    memory: Vec<(String, String)>,
    log: Arc<Mutex<ChainLog>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedChain {
    pub fn new() -> Self {
        Self {
            answers: VecDeque::new(),
            memory: Vec::new(),
            log: Arc::new(Mutex::new(ChainLog::default())),
            gate: None,
        }
    }

    /// Every call waits for a permit on the returned gate before answering.
    pub fn gated(mut self) -> (Self, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn answer(mut self, content: &str) -> Self {
        self.answers.push_back(Ok(content.to_string()));
        self
    }

    pub fn fail(mut self) -> Self {
        self.answers.push_back(Err(LlmError::Transport {
            provider: "scripted".to_string(),
            message: "connection reset".to_string(),
        }));
        self
    }

    pub fn log(&self) -> Arc<Mutex<ChainLog>> {
        self.log.clone()
    }
}

#[async_trait]
impl ConversationChain for ScriptedChain {
    async fn call(&mut self, question: &str) -> Result<ChainOutput, ChainError> {
        self.log.lock().unwrap().questions.push(question.to_string());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let answer = self.answers.pop_front().unwrap_or_else(|| Ok("ok".to_string()))?;

        self.memory.push((question.to_string(), answer.clone()));
        let chat_history = self
            .memory
            .iter()
            .flat_map(|(q, a)| [ChatMessage::user(q), ChatMessage::assistant(a)])
            .collect();

        Ok(ChainOutput {
            question: question.to_string(),
            answer,
            chat_history,
            source_documents: Vec::new(),
        })
    }

    fn clear_memory(&mut self) {
        self.memory.clear();
        self.log.lock().unwrap().clears += 1;
    }

    fn restore_memory(&mut self, exchanges: Vec<(String, String)>) {
        self.memory = exchanges.clone();
        self.log.lock().unwrap().restored.push(exchanges);
    }
}
