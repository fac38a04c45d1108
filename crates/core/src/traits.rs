use crate::error::ChatError;
use crate::models::ChatMessage;
use async_trait::async_trait;

/// Embedding backend seam. One batch call per knowledge-base build plus one
/// query call per question.
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Stable provider name used in error reporting.
    fn name(&self) -> &str;

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ChatError>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, ChatError>;
}

/// Chat model seam. `context` carries the retrieved chunks, `history` the
/// full prior conversation in order, `question` the new user turn.
#[async_trait]
pub trait ChatModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(
        &self,
        context: &str,
        history: &[ChatMessage],
        question: &str,
    ) -> Result<String, ChatError>;
}
