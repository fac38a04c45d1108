use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document handed to the pipeline as raw bytes. Read once during
/// ingestion, then discarded.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub name: String,
    pub checksum: String,
    pub page_count: usize,
    pub char_count: usize,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            role: Role::Bot,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub text: String,
    pub score: f32,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub answer: String,
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Clone)]
pub struct ProcessSummary {
    pub documents: Vec<DocumentSummary>,
    pub corpus_chars: usize,
    pub chunk_count: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EmbeddingProviderKind {
    /// Paid remote embedding API.
    OpenAi,
    /// Free but slower self-hosted instruction-tuned model.
    Instructor,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum LlmProviderKind {
    /// Paid hosted chat-completion API.
    OpenAi,
    /// Free hosted instruction model.
    Flan,
}

/// Display label to provider mapping, in selector order. The mapping lives
/// here and nowhere else: upstream variants of this tool disagreed on which
/// label selected which embedding class, so the table is the single source
/// of truth and is covered by tests.
pub const EMBEDDING_PROVIDER_LABELS: [(&str, EmbeddingProviderKind); 2] = [
    ("OpenAI (text-embedding-ada-002)", EmbeddingProviderKind::OpenAi),
    (
        "Instructor (hkunlp/instructor-xl)",
        EmbeddingProviderKind::Instructor,
    ),
];

pub const LLM_PROVIDER_LABELS: [(&str, LlmProviderKind); 2] = [
    ("OpenAI (gpt-3.5-turbo)", LlmProviderKind::OpenAi),
    ("Flan (google/flan-t5-xxl)", LlmProviderKind::Flan),
];

impl EmbeddingProviderKind {
    pub fn from_label(label: &str) -> Option<Self> {
        EMBEDDING_PROVIDER_LABELS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, kind)| *kind)
    }

    pub fn label(self) -> &'static str {
        EMBEDDING_PROVIDER_LABELS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(label, _)| *label)
            .unwrap_or_else(|| unreachable!("every embedding provider kind has a label"))
    }
}

impl LlmProviderKind {
    pub fn from_label(label: &str) -> Option<Self> {
        LLM_PROVIDER_LABELS
            .iter()
            .find(|(known, _)| *known == label)
            .map(|(_, kind)| *kind)
    }

    pub fn label(self) -> &'static str {
        LLM_PROVIDER_LABELS
            .iter()
            .find(|(_, kind)| *kind == self)
            .map(|(label, _)| *label)
            .unwrap_or_else(|| unreachable!("every llm provider kind has a label"))
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ChatOptions {
    /// Number of chunks retrieved as model context per question.
    pub top_k: usize,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedding_labels_round_trip() {
        for (label, kind) in EMBEDDING_PROVIDER_LABELS {
            assert_eq!(EmbeddingProviderKind::from_label(label), Some(kind));
            assert_eq!(kind.label(), label);
        }
    }

    #[test]
    fn llm_labels_round_trip() {
        for (label, kind) in LLM_PROVIDER_LABELS {
            assert_eq!(LlmProviderKind::from_label(label), Some(kind));
            assert_eq!(kind.label(), label);
        }
    }

    #[test]
    fn unknown_label_is_rejected_not_ignored() {
        assert_eq!(EmbeddingProviderKind::from_label("OpenAI"), None);
        assert_eq!(LlmProviderKind::from_label("gpt-3.5-turbo"), None);
    }
}
