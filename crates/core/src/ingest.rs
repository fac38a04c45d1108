use crate::error::IngestError;
use crate::extractor::{LopdfExtractor, PdfExtractor};
use crate::models::{DocumentSummary, UploadedDocument};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn discover_pdf_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_pdf = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));

        if is_pdf {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

pub fn load_documents(paths: &[PathBuf]) -> Result<Vec<UploadedDocument>, IngestError> {
    if paths.is_empty() {
        return Err(IngestError::InvalidArgument(
            "no documents to load".to_string(),
        ));
    }

    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                IngestError::MissingFileName(format!("path missing filename: {}", path.display()))
            })?;

        documents.push(UploadedDocument {
            name: name.to_string(),
            bytes: fs::read(path)?,
        });
    }

    Ok(documents)
}

/// Concatenates every page of every document into one corpus string, in
/// upload order then page order, with no injected separators. Any document
/// that fails to parse aborts the whole build.
pub fn build_corpus(
    documents: &[UploadedDocument],
) -> Result<(String, Vec<DocumentSummary>), IngestError> {
    if documents.is_empty() {
        return Err(IngestError::InvalidArgument(
            "no documents uploaded".to_string(),
        ));
    }

    let extractor = LopdfExtractor;
    let mut corpus = String::new();
    let mut summaries = Vec::with_capacity(documents.len());

    for document in documents {
        let pages = extractor.extract_pages(&document.name, &document.bytes)?;
        let mut char_count = 0usize;
        let page_count = pages.len();

        for page in pages {
            char_count += page.text.chars().count();
            corpus.push_str(&page.text);
        }

        summaries.push(DocumentSummary {
            name: document.name.clone(),
            checksum: digest_bytes(&document.bytes),
            page_count,
            char_count,
            ingested_at: Utc::now(),
        });
    }

    Ok((corpus, summaries))
}

pub fn digest_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}
