use askdoc_core::{
    discover_pdf_files, load_documents, render_transcript, ChatError, ChatOptions, ChatSession,
    EmbeddingProviderKind, LlmProviderKind, UploadedDocument,
};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "askdoc", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Embedding provider used to build the knowledge base.
    #[arg(long, value_enum, default_value_t = EmbeddingArg::Instructor)]
    embeddings: EmbeddingArg,

    /// Language model used to answer questions.
    #[arg(long, value_enum, default_value_t = LlmArg::Flan)]
    llm: LlmArg,

    /// Chunks retrieved as context per question.
    #[arg(long, default_value = "4")]
    top_k: usize,
}

#[derive(Clone, Copy, ValueEnum)]
enum EmbeddingArg {
    /// Paid remote embedding API.
    Openai,
    /// Free self-hosted instructor server.
    Instructor,
}

impl From<EmbeddingArg> for EmbeddingProviderKind {
    fn from(value: EmbeddingArg) -> Self {
        match value {
            EmbeddingArg::Openai => EmbeddingProviderKind::OpenAi,
            EmbeddingArg::Instructor => EmbeddingProviderKind::Instructor,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum LlmArg {
    /// Paid hosted chat-completion API.
    Openai,
    /// Free hosted instruction model.
    Flan,
}

impl From<LlmArg> for LlmProviderKind {
    fn from(value: LlmArg) -> Self {
        match value {
            LlmArg::Openai => LlmProviderKind::OpenAi,
            LlmArg::Flan => LlmProviderKind::Flan,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Process documents, then answer questions interactively from stdin.
    Chat {
        /// Folder scanned recursively for PDFs.
        #[arg(long)]
        folder: Option<PathBuf>,
        /// Individual PDF files, in upload order.
        #[arg(long = "file")]
        files: Vec<PathBuf>,
        /// Write the rendered HTML transcript here on exit.
        #[arg(long)]
        transcript: Option<PathBuf>,
    },
    /// Process documents and answer a single question.
    Ask {
        #[arg(long)]
        question: String,
        #[arg(long)]
        folder: Option<PathBuf>,
        #[arg(long = "file")]
        files: Vec<PathBuf>,
    },
}

fn collect_documents(
    folder: Option<&PathBuf>,
    files: &[PathBuf],
) -> anyhow::Result<Vec<UploadedDocument>> {
    let mut paths = files.to_vec();
    if let Some(folder) = folder {
        paths.extend(discover_pdf_files(folder));
    }

    if paths.is_empty() {
        anyhow::bail!("no documents given; pass --folder or --file");
    }

    load_documents(&paths).map_err(|error| anyhow::anyhow!(error.to_string()))
}

async fn process(
    session: &mut ChatSession,
    documents: &[UploadedDocument],
    embeddings: EmbeddingProviderKind,
    llm: LlmProviderKind,
) -> anyhow::Result<()> {
    info!(
        document_count = documents.len(),
        embeddings = embeddings.label(),
        llm = llm.label(),
        "processing documents"
    );

    let summary = session
        .process(documents, embeddings, llm)
        .await
        .map_err(|error| anyhow::anyhow!(error.to_string()))?;

    for document in &summary.documents {
        info!(
            name = %document.name,
            pages = document.page_count,
            chars = document.char_count,
            checksum = %document.checksum,
            "ingested document"
        );
    }
    println!(
        "{} chunks indexed from {} document(s) at {}",
        summary.chunk_count,
        summary.documents.len(),
        Utc::now().to_rfc3339()
    );

    Ok(())
}

async fn answer(session: &mut ChatSession, question: &str) -> anyhow::Result<()> {
    let started = std::time::Instant::now();
    match session.ask(question).await {
        Ok(reply) => {
            info!(elapsed_ms = started.elapsed().as_millis() as u64, "answered");
            println!("{}", reply.answer);
            Ok(())
        }
        Err(ChatError::MissingState(_)) => {
            println!("Please upload and process your documents first.");
            Ok(())
        }
        Err(error) => Err(anyhow::anyhow!(error.to_string())),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let app_version = env!("CARGO_PKG_VERSION");

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer())
        .init();

    let cli = Cli::parse();
    info!(
        version = app_version,
        started_at = %Utc::now().to_rfc3339(),
        "askdoc boot"
    );

    let mut session = ChatSession::new(ChatOptions { top_k: cli.top_k });
    let embeddings = EmbeddingProviderKind::from(cli.embeddings);
    let llm = LlmProviderKind::from(cli.llm);

    match cli.command {
        Command::Chat {
            folder,
            files,
            transcript,
        } => {
            let documents = collect_documents(folder.as_ref(), &files)?;
            process(&mut session, &documents, embeddings, llm).await?;

            println!("Ask a question about your documents (empty line to quit):");
            let stdin = io::stdin();
            loop {
                print!("? ");
                io::stdout().flush()?;

                let mut line = String::new();
                if stdin.lock().read_line(&mut line)? == 0 {
                    break;
                }
                let question = line.trim();
                if question.is_empty() {
                    break;
                }

                answer(&mut session, question).await?;
            }

            if let Some(path) = transcript {
                std::fs::write(&path, render_transcript(session.history()))?;
                info!(path = %path.display(), turns = session.history().len(), "transcript written");
            }
        }
        Command::Ask {
            question,
            folder,
            files,
        } => {
            let documents = collect_documents(folder.as_ref(), &files)?;
            process(&mut session, &documents, embeddings, llm).await?;
            answer(&mut session, &question).await?;
        }
    }

    Ok(())
}
