pub mod chunking;
pub mod conversation;
pub mod error;
pub mod extractor;
pub mod index;
pub mod ingest;
pub mod models;
pub mod providers;
pub mod render;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use chunking::{split_corpus, ChunkingConfig};
pub use conversation::ConversationChain;
pub use error::{ChatError, IngestError};
pub use extractor::{LopdfExtractor, PageText, PdfExtractor};
pub use index::KnowledgeBase;
pub use ingest::{build_corpus, digest_bytes, discover_pdf_files, load_documents};
pub use models::{
    ChatMessage, ChatOptions, ChatReply, DocumentSummary, EmbeddingProviderKind, LlmProviderKind,
    ProcessSummary, Role, ScoredChunk, UploadedDocument, EMBEDDING_PROVIDER_LABELS,
    LLM_PROVIDER_LABELS,
};
pub use providers::{
    chat_model, embedding_client, FlanModel, InstructorEmbeddings, OpenAiChat, OpenAiEmbeddings,
};
pub use render::{escape_html, render_message, render_transcript};
pub use session::{ChatSession, SessionPhase};
pub use traits::{ChatModel, EmbeddingClient};
