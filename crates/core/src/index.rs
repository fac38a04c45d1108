use crate::error::ChatError;
use crate::models::ScoredChunk;
use crate::traits::EmbeddingClient;

#[derive(Debug, Clone)]
struct IndexedChunk {
    text: String,
    vector: Vec<f32>,
}

/// Session-local similarity index over embedded chunks. Built once per
/// process action and replaced wholesale on the next one; there is no
/// incremental update path.
pub struct KnowledgeBase {
    entries: Vec<IndexedChunk>,
}

impl KnowledgeBase {
    pub async fn build(
        chunks: Vec<String>,
        embedder: &dyn EmbeddingClient,
    ) -> Result<Self, ChatError> {
        if chunks.is_empty() {
            return Err(ChatError::EmbeddingProvider {
                provider: embedder.name().to_string(),
                details: "empty chunk list".to_string(),
            });
        }

        let vectors = embedder.embed_batch(&chunks).await?;
        if vectors.len() != chunks.len() {
            return Err(ChatError::EmbeddingProvider {
                provider: embedder.name().to_string(),
                details: format!(
                    "returned {} embeddings for {} chunks",
                    vectors.len(),
                    chunks.len()
                ),
            });
        }

        let entries = chunks
            .into_iter()
            .zip(vectors)
            .map(|(text, vector)| IndexedChunk { text, vector })
            .collect();

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Top-k chunks by cosine similarity, most similar first.
    pub fn search(&self, query_vector: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        let mut scored: Vec<ScoredChunk> = self
            .entries
            .iter()
            .map(|entry| ScoredChunk {
                text: entry.text.clone(),
                score: cosine_similarity(&entry.vector, query_vector),
            })
            .collect();

        scored.sort_by(|left, right| right.score.total_cmp(&left.score));
        scored.truncate(top_k);
        scored
    }
}

fn cosine_similarity(left: &[f32], right: &[f32]) -> f32 {
    if left.len() != right.len() || left.is_empty() {
        return 0.0;
    }

    let mut dot = 0f32;
    let mut left_norm = 0f32;
    let mut right_norm = 0f32;
    for (a, b) in left.iter().zip(right) {
        dot += a * b;
        left_norm += a * a;
        right_norm += b * b;
    }

    let magnitude = left_norm.sqrt() * right_norm.sqrt();
    if magnitude > 0.0 {
        dot / magnitude
    } else {
        0.0
    }
}
