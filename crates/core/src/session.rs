use crate::chunking::{split_corpus, ChunkingConfig};
use crate::conversation::ConversationChain;
use crate::error::ChatError;
use crate::index::KnowledgeBase;
use crate::ingest::build_corpus;
use crate::models::{
    ChatMessage, ChatOptions, ChatReply, EmbeddingProviderKind, LlmProviderKind, ProcessSummary,
    UploadedDocument,
};
use crate::providers;
use crate::traits::{ChatModel, EmbeddingClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No knowledge base yet; questions are rejected.
    Idle,
    /// Knowledge base and conversation chain are built.
    Ready,
}

/// Per-session pipeline state. Created empty, populated by `process`, and
/// rebuilt from scratch on every re-process; nothing is shared across
/// sessions.
pub struct ChatSession {
    chain: Option<ConversationChain>,
    options: ChatOptions,
    chunking: ChunkingConfig,
}

impl ChatSession {
    pub fn new(options: ChatOptions) -> Self {
        Self {
            chain: None,
            options,
            chunking: ChunkingConfig::default(),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        if self.chain.is_some() {
            SessionPhase::Ready
        } else {
            SessionPhase::Idle
        }
    }

    /// Runs the full ingestion pipeline with providers constructed from the
    /// selected kinds. Provider credentials are read from the environment
    /// at this point.
    pub async fn process(
        &mut self,
        documents: &[UploadedDocument],
        embedding_kind: EmbeddingProviderKind,
        llm_kind: LlmProviderKind,
    ) -> Result<ProcessSummary, ChatError> {
        let embedder = providers::embedding_client(embedding_kind)?;
        let model = providers::chat_model(llm_kind)?;
        self.process_with(documents, embedder, model).await
    }

    /// Pipeline body with injected backends. Any prior chain is discarded
    /// up front, so a failed rebuild leaves the session idle rather than
    /// answering from stale state.
    pub async fn process_with(
        &mut self,
        documents: &[UploadedDocument],
        embedder: Box<dyn EmbeddingClient>,
        model: Box<dyn ChatModel>,
    ) -> Result<ProcessSummary, ChatError> {
        self.chain = None;

        let (corpus, summaries) = build_corpus(documents)?;
        let chunks = split_corpus(&corpus, &self.chunking)?;
        let knowledge_base = KnowledgeBase::build(chunks, embedder.as_ref()).await?;
        let chunk_count = knowledge_base.len();

        self.chain = Some(ConversationChain::new(
            knowledge_base,
            embedder,
            model,
            self.options.top_k,
        ));

        Ok(ProcessSummary {
            documents: summaries,
            corpus_chars: corpus.chars().count(),
            chunk_count,
        })
    }

    pub async fn ask(&mut self, question: &str) -> Result<ChatReply, ChatError> {
        match self.chain.as_mut() {
            Some(chain) => chain.ask(question).await,
            None => Err(ChatError::MissingState(
                "upload your documents and run processing before asking questions".to_string(),
            )),
        }
    }

    pub fn history(&self) -> &[ChatMessage] {
        self.chain
            .as_ref()
            .map(ConversationChain::history)
            .unwrap_or(&[])
    }

    pub fn reset(&mut self) {
        self.chain = None;
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(ChatOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatSession, SessionPhase};
    use crate::error::ChatError;
    use crate::models::{ChatMessage, UploadedDocument};
    use crate::test_support::minimal_pdf;
    use crate::traits::{ChatModel, EmbeddingClient};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingEmbedder {
        label: &'static str,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EmbeddingClient for CountingEmbedder {
        fn name(&self) -> &str {
            self.label
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
        }

        async fn embed_query(&self, _text: &str) -> Result<Vec<f32>, ChatError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0])
        }
    }

    struct CannedModel;

    #[async_trait]
    impl ChatModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            _context: &str,
            _history: &[ChatMessage],
            _question: &str,
        ) -> Result<String, ChatError> {
            Ok("a canned answer".to_string())
        }
    }

    fn sample_documents() -> Vec<UploadedDocument> {
        vec![UploadedDocument {
            name: "manual.pdf".to_string(),
            bytes: minimal_pdf("The pump operates at 40 psi under normal load."),
        }]
    }

    #[tokio::test]
    async fn question_before_processing_is_a_missing_state_error() {
        let mut session = ChatSession::default();
        assert_eq!(session.phase(), SessionPhase::Idle);

        match session.ask("anyone there?").await {
            Err(ChatError::MissingState(message)) => {
                assert!(message.contains("process"));
            }
            other => panic!("expected MissingState, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn processing_builds_a_ready_session() {
        let mut session = ChatSession::default();
        let calls = Arc::new(AtomicUsize::new(0));

        let summary = session
            .process_with(
                &sample_documents(),
                Box::new(CountingEmbedder {
                    label: "fake",
                    calls: calls.clone(),
                }),
                Box::new(CannedModel),
            )
            .await
            .expect("processing should succeed");

        assert_eq!(session.phase(), SessionPhase::Ready);
        assert_eq!(summary.documents.len(), 1);
        assert_eq!(summary.documents[0].page_count, 1);
        assert!(summary.chunk_count >= 1);

        let reply = session.ask("what pressure?").await.expect("ask succeeds");
        assert_eq!(reply.answer, "a canned answer");
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn reprocessing_uses_only_the_newly_selected_provider() {
        let mut session = ChatSession::default();
        let first_calls = Arc::new(AtomicUsize::new(0));
        let second_calls = Arc::new(AtomicUsize::new(0));

        session
            .process_with(
                &sample_documents(),
                Box::new(CountingEmbedder {
                    label: "provider-a",
                    calls: first_calls.clone(),
                }),
                Box::new(CannedModel),
            )
            .await
            .expect("first processing");

        session
            .process_with(
                &sample_documents(),
                Box::new(CountingEmbedder {
                    label: "provider-b",
                    calls: second_calls.clone(),
                }),
                Box::new(CannedModel),
            )
            .await
            .expect("second processing");

        let after_rebuild = first_calls.load(Ordering::SeqCst);
        session.ask("still there?").await.expect("ask succeeds");

        assert_eq!(first_calls.load(Ordering::SeqCst), after_rebuild);
        assert!(second_calls.load(Ordering::SeqCst) > 1);
        assert_eq!(session.history().len(), 2);
    }

    #[tokio::test]
    async fn failed_rebuild_leaves_the_session_idle() {
        let mut session = ChatSession::default();
        let calls = Arc::new(AtomicUsize::new(0));

        session
            .process_with(
                &sample_documents(),
                Box::new(CountingEmbedder {
                    label: "fake",
                    calls: calls.clone(),
                }),
                Box::new(CannedModel),
            )
            .await
            .expect("first processing");

        let broken = vec![UploadedDocument {
            name: "broken.pdf".to_string(),
            bytes: b"%PDF-1.4\n%broken".to_vec(),
        }];
        let result = session
            .process_with(
                &broken,
                Box::new(CountingEmbedder {
                    label: "fake",
                    calls,
                }),
                Box::new(CannedModel),
            )
            .await;

        assert!(result.is_err());
        assert_eq!(session.phase(), SessionPhase::Idle);
    }
}
