use crate::error::ChatError;
use crate::models::{ChatMessage, Role};
use crate::traits::{ChatModel, EmbeddingClient};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const EMBEDDING_MODEL: &str = "text-embedding-ada-002";
const CHAT_MODEL: &str = "gpt-3.5-turbo";

fn api_key_from_env() -> Result<String, ChatError> {
    std::env::var("OPENAI_API_KEY")
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ChatError::MissingCredential("OPENAI_API_KEY is not set".to_string()))
}

pub struct OpenAiEmbeddings {
    client: Client,
    api_base: String,
    api_key: String,
}

impl OpenAiEmbeddings {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, ChatError> {
        Ok(Self::new(DEFAULT_API_BASE, api_key_from_env()?))
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbeddings {
    fn name(&self) -> &str {
        "openai-embeddings"
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": EMBEDDING_MODEL,
                "input": texts,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::EmbeddingProvider {
                provider: self.name().to_string(),
                details: format!("{status}: {body}"),
            });
        }

        let parsed: Value = response.json().await?;
        let rows = parsed
            .pointer("/data")
            .and_then(Value::as_array)
            .ok_or_else(|| ChatError::EmbeddingProvider {
                provider: self.name().to_string(),
                details: "response has no data array".to_string(),
            })?;

        let mut vectors = Vec::with_capacity(rows.len());
        for row in rows {
            let embedding = row
                .pointer("/embedding")
                .and_then(Value::as_array)
                .ok_or_else(|| ChatError::EmbeddingProvider {
                    provider: self.name().to_string(),
                    details: "row has no embedding".to_string(),
                })?;

            vectors.push(
                embedding
                    .iter()
                    .filter_map(Value::as_f64)
                    .map(|value| value as f32)
                    .collect(),
            );
        }

        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ChatError> {
        let mut vectors = self.embed_batch(&[text.to_string()]).await?;
        vectors.pop().ok_or_else(|| ChatError::EmbeddingProvider {
            provider: self.name().to_string(),
            details: "empty embedding response for query".to_string(),
        })
    }
}

pub struct OpenAiChat {
    client: Client,
    api_base: String,
    api_key: String,
}

impl OpenAiChat {
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_base: api_base.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_env() -> Result<Self, ChatError> {
        Ok(Self::new(DEFAULT_API_BASE, api_key_from_env()?))
    }
}

#[async_trait]
impl ChatModel for OpenAiChat {
    fn name(&self) -> &str {
        "openai-chat"
    }

    async fn complete(
        &self,
        context: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, ChatError> {
        let mut messages = vec![json!({
            "role": "system",
            "content": format!(
                "Answer the user's question using the document excerpts below.\n\n{context}"
            ),
        })];

        for message in history {
            let role = match message.role {
                Role::User => "user",
                Role::Bot => "assistant",
            };
            messages.push(json!({ "role": role, "content": message.content }));
        }
        messages.push(json!({ "role": "user", "content": question }));

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&json!({
                "model": CHAT_MODEL,
                "messages": messages,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::ModelProvider {
                provider: self.name().to_string(),
                details: format!("{status}: {body}"),
            });
        }

        let parsed: Value = response.json().await?;
        parsed
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(|answer| answer.trim().to_string())
            .ok_or_else(|| ChatError::ModelProvider {
                provider: self.name().to_string(),
                details: "response has no message content".to_string(),
            })
    }
}
