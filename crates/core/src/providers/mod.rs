pub mod huggingface;
pub mod openai;

pub use huggingface::{FlanModel, InstructorEmbeddings};
pub use openai::{OpenAiChat, OpenAiEmbeddings};

use crate::error::ChatError;
use crate::models::{EmbeddingProviderKind, LlmProviderKind};
use crate::traits::{ChatModel, EmbeddingClient};

/// Constructs the embedding backend for a selected provider. The match is
/// exhaustive over the provider sum type, so an unrecognized selection
/// cannot silently fall through the way a string switch would.
pub fn embedding_client(
    kind: EmbeddingProviderKind,
) -> Result<Box<dyn EmbeddingClient>, ChatError> {
    match kind {
        EmbeddingProviderKind::OpenAi => Ok(Box::new(OpenAiEmbeddings::from_env()?)),
        EmbeddingProviderKind::Instructor => Ok(Box::new(InstructorEmbeddings::from_env())),
    }
}

pub fn chat_model(kind: LlmProviderKind) -> Result<Box<dyn ChatModel>, ChatError> {
    match kind {
        LlmProviderKind::OpenAi => Ok(Box::new(OpenAiChat::from_env()?)),
        LlmProviderKind::Flan => Ok(Box::new(FlanModel::from_env()?)),
    }
}
