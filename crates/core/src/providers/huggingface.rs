use crate::error::ChatError;
use crate::models::{ChatMessage, Role};
use crate::traits::{ChatModel, EmbeddingClient};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};

const DEFAULT_INSTRUCTOR_ENDPOINT: &str = "http://localhost:8080";
const FLAN_ENDPOINT: &str = "https://api-inference.huggingface.co/models/google/flan-t5-xxl";
const INSTRUCTOR_MODEL: &str = "hkunlp/instructor-xl";

/// Embeddings from a self-hosted instructor server. Free to run, slower
/// than the paid API.
pub struct InstructorEmbeddings {
    client: Client,
    endpoint: String,
}

impl InstructorEmbeddings {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_env() -> Self {
        let endpoint = std::env::var("INSTRUCTOR_ENDPOINT")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_INSTRUCTOR_ENDPOINT.to_string());

        Self::new(endpoint)
    }
}

#[async_trait]
impl EmbeddingClient for InstructorEmbeddings {
    fn name(&self) -> &str {
        "instructor-embeddings"
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
        let response = self
            .client
            .post(format!("{}/embed", self.endpoint))
            .json(&json!({
                "model": INSTRUCTOR_MODEL,
                "inputs": texts,
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
            .pointer("/embeddings")
            .and_then(Value::as_array)
            .ok_or_else(|| ChatError::EmbeddingProvider {
                provider: self.name().to_string(),
                details: "response has no embeddings array".to_string(),
            })?;

        let vectors = rows
            .iter()
            .map(|row| {
                row.as_array()
                    .map(|values| {
                        values
                            .iter()
                            .filter_map(Value::as_f64)
                            .map(|value| value as f32)
                            .collect::<Vec<f32>>()
                    })
                    .ok_or_else(|| ChatError::EmbeddingProvider {
                        provider: self.name().to_string(),
                        details: "embedding row is not an array".to_string(),
                    })
            })
            .collect::<Result<Vec<_>, ChatError>>()?;

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

/// Hosted instruction model on the Hugging Face inference API.
pub struct FlanModel {
    client: Client,
    endpoint: String,
    api_token: String,
}

impl FlanModel {
    pub fn new(endpoint: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_token: api_token.into(),
        }
    }

    pub fn from_env() -> Result<Self, ChatError> {
        let token = std::env::var("HUGGINGFACEHUB_API_TOKEN")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| {
                ChatError::MissingCredential("HUGGINGFACEHUB_API_TOKEN is not set".to_string())
            })?;

        Ok(Self::new(FLAN_ENDPOINT, token))
    }
}

#[async_trait]
impl ChatModel for FlanModel {
    fn name(&self) -> &str {
        "flan-t5-xxl"
    }

    async fn complete(
        &self,
        context: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, ChatError> {
        // Instruction models take one flat prompt instead of role messages.
        let mut prompt = String::from(
            "Answer the user's question using the document excerpts below.\n\n",
        );
        prompt.push_str(context);
        prompt.push_str("\n\n");
        for message in history {
            let speaker = match message.role {
                Role::User => "User",
                Role::Bot => "Assistant",
            };
            prompt.push_str(&format!("{speaker}: {}\n", message.content));
        }
        prompt.push_str(&format!("User: {question}\nAssistant:"));

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_token)
            .json(&json!({
                "inputs": prompt,
                "parameters": {
                    "temperature": 0.5,
                    "max_length": 512,
                },
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
            .pointer("/0/generated_text")
            .and_then(Value::as_str)
            .map(|answer| answer.trim().to_string())
            .ok_or_else(|| ChatError::ModelProvider {
                provider: self.name().to_string(),
                details: "response has no generated text".to_string(),
            })
    }
}
