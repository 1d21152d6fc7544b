use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::LlmError;
use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::config::OpenAiConfig;

const PROVIDER_NAME: &str = "openai";

#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    api_key: String,
    chat_model: String,
    embedding_model: String,
    temperature: f64,
    client: Client,
}

impl OpenAiProvider {
    pub fn new(api_key: String, config: &OpenAiConfig) -> Result<Self, LlmError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(transport_error)?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
            client,
        })
    }

    async fn post_json(&self, endpoint: &str, body: &Value) -> Result<Value, LlmError> {
        let url = format!("{}/{}", self.base_url, endpoint);

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                provider: PROVIDER_NAME.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        res.json::<Value>().await.map_err(|e| malformed(e.to_string()))
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, LlmError> {
        let body = json!({
            "model": self.chat_model,
            "messages": request.messages,
            "temperature": self.temperature,
        });

        tracing::debug!(model = %self.chat_model, "Sending chat completion request");
        let payload = self.post_json("chat/completions", &body).await?;

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.to_string())
            .ok_or_else(|| malformed("missing choices[0].message.content"))
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let body = json!({
            "model": self.embedding_model,
            "input": inputs,
        });

        let payload = self.post_json("embeddings", &body).await?;
        let mut response: EmbeddingResponse =
            serde_json::from_value(payload).map_err(|e| malformed(e.to_string()))?;

        if response.data.len() != inputs.len() {
            return Err(malformed(format!(
                "expected {} embeddings, got {}",
                inputs.len(),
                response.data.len()
            )));
        }

        response.data.sort_by_key(|item| item.index);
        Ok(response.data.into_iter().map(|item| item.embedding).collect())
    }
}

fn transport_error(err: reqwest::Error) -> LlmError {
    LlmError::Transport {
        provider: PROVIDER_NAME.to_string(),
        message: err.to_string(),
    }
}

fn malformed(message: impl Into<String>) -> LlmError {
    LlmError::Malformed {
        provider: PROVIDER_NAME.to_string(),
        message: message.into(),
    }
}
