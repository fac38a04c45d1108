use crate::error::ChatError;
use crate::index::KnowledgeBase;
use crate::models::{ChatMessage, ChatReply};
use crate::traits::{ChatModel, EmbeddingClient};

/// How many trailing history messages join the question when building the
/// retrieval query (two full user/bot exchanges).
const RETRIEVAL_HISTORY_MESSAGES: usize = 4;

/// Retrieval, model, and memory wired into one question-answering pipeline.
/// The history strictly alternates user/bot starting with user and is never
/// truncated.
pub struct ConversationChain {
    knowledge_base: KnowledgeBase,
    embedder: Box<dyn EmbeddingClient>,
    model: Box<dyn ChatModel>,
    history: Vec<ChatMessage>,
    top_k: usize,
}

impl ConversationChain {
    pub fn new(
        knowledge_base: KnowledgeBase,
        embedder: Box<dyn EmbeddingClient>,
        model: Box<dyn ChatModel>,
        top_k: usize,
    ) -> Self {
        Self {
            knowledge_base,
            embedder,
            model,
            history: Vec::new(),
            top_k,
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub async fn ask(&mut self, question: &str) -> Result<ChatReply, ChatError> {
        let retrieval_query = self.retrieval_query(question);
        let query_vector = self.embedder.embed_query(&retrieval_query).await?;
        let hits = self.knowledge_base.search(&query_vector, self.top_k);

        let context = hits
            .iter()
            .map(|hit| hit.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n---\n\n");

        let answer = self.model.complete(&context, &self.history, question).await?;

        // Append only after the model call succeeds, so a provider failure
        // leaves the history without a dangling half-exchange.
        self.history.push(ChatMessage::user(question));
        self.history.push(ChatMessage::bot(answer.clone()));

        Ok(ChatReply {
            answer,
            history: self.history.clone(),
        })
    }

    /// Question plus the tail of the conversation, so follow-ups like
    /// "what about the second one?" still retrieve against their subject.
    fn retrieval_query(&self, question: &str) -> String {
        let tail_start = self.history.len().saturating_sub(RETRIEVAL_HISTORY_MESSAGES);
        let mut parts: Vec<&str> = self.history[tail_start..]
            .iter()
            .map(|message| message.content.as_str())
            .collect();
        parts.push(question);
        parts.join("\n")
    }
}
