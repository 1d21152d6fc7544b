use std::sync::Arc;

use crate::chain::{ConversationChain, ConversationalRetrievalChain};
use crate::core::config::{AppConfig, ConfigService};
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::rag::load_retriever;
use crate::session::{ChatSession, EventBus};

pub mod error;

use error::InitializationError;

/// Process-wide state shared by every route.
///
/// Handlers run one at a time and each runs to completion, including its
/// chain call; see [`ChatSession`] for the locking.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub events: EventBus,
    pub session: Arc<ChatSession>,
}

impl AppState {
    /// Builds the state the server runs with:
    /// 1. Creating the OpenAI client from the credential
    /// 2. Loading the vector index and wrapping it in a retriever
    /// 3. Building the conversation chain and the chat session around it
    ///
    /// Any failure here is fatal; no chat is possible without the index.
    pub fn initialize(
        config_service: &ConfigService,
        config: AppConfig,
        api_key: String,
    ) -> Result<Arc<Self>, InitializationError> {
        tracing::info!("Initializing state...");

        let llm: Arc<dyn LlmProvider> = Arc::new(OpenAiProvider::new(api_key, &config.openai)?);

        let index_dir = config_service.index_dir(&config);
        let retriever = load_retriever(&index_dir, llm.clone(), config.index.top_k)?;

        let chain = ConversationalRetrievalChain::from_llm(llm, retriever);
        tracing::info!("Conversation chain created.");

        let state = Self::with_chain(config, Box::new(chain));
        tracing::info!("State initialized");
        Ok(state)
    }

    /// Wires a session around an already-built chain.
    pub fn with_chain(config: AppConfig, chain: Box<dyn ConversationChain>) -> Arc<Self> {
        let events = EventBus::default();
        let session = ChatSession::new(chain, events.clone());

        Arc::new(AppState {
            config,
            events,
            session: Arc::new(session),
        })
    }
}
