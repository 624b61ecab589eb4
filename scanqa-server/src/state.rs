//! Shared application state and the per-process document registry.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use scanqa_ocr::TextExtractor;
use scanqa_rag::QaPipeline;
use serde::Serialize;
use tokio::sync::RwLock;

/// Upload-time metadata for one document.
///
/// The registry entry is what the document listing and detail endpoints
/// serve; the chunk index itself lives in the pipeline's document store.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    /// Server-minted document id.
    pub id: String,
    /// Original filename from the upload.
    pub filename: String,
    /// First lines of the extracted text, for the document view.
    pub summary: String,
    /// Number of chunks the document was indexed into.
    pub chunk_count: usize,
    /// Upload timestamp.
    pub uploaded_at: DateTime<Utc>,
}

/// State shared by all request handlers.
///
/// Everything is owned here and handed to handlers by `State`: the
/// registry and the document store are constructed once at startup and
/// injected, never reached through module-level globals.
pub struct AppState {
    /// The ingest-and-answer pipeline.
    pub pipeline: Arc<QaPipeline>,
    /// Extracts text from uploaded files.
    pub extractor: Arc<dyn TextExtractor>,
    /// Document id → upload metadata, for the process lifetime.
    pub registry: RwLock<HashMap<String, DocumentRecord>>,
    /// Directory uploaded files are saved into.
    pub upload_dir: PathBuf,
}

impl AppState {
    /// Create the shared state.
    pub fn new(
        pipeline: Arc<QaPipeline>,
        extractor: Arc<dyn TextExtractor>,
        upload_dir: PathBuf,
    ) -> Self {
        Self { pipeline, extractor, registry: RwLock::new(HashMap::new()), upload_dir }
    }
}

/// Number of leading text lines included in a document summary.
const SUMMARY_LINES: usize = 5;

/// Maximum summary length in characters.
const SUMMARY_MAX_CHARS: usize = 500;

/// Build the short document summary shown in listings: the first few
/// non-blank lines of the extracted text, truncated.
pub fn summarize(text: &str) -> String {
    let lines: Vec<&str> =
        text.lines().map(str::trim).filter(|l| !l.is_empty()).take(SUMMARY_LINES).collect();
    if lines.is_empty() {
        return "Summary not available.".to_string();
    }
    lines.join("\n").chars().take(SUMMARY_MAX_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_takes_leading_non_blank_lines() {
        let text = "Title\n\nfirst line\nsecond line\nthird\nfourth\nfifth\nsixth";
        let summary = summarize(text);
        assert!(summary.starts_with("Title\nfirst line"));
        assert!(!summary.contains("sixth"));
    }

    #[test]
    fn summary_of_blank_text_is_a_placeholder() {
        assert_eq!(summarize("\n \n"), "Summary not available.");
    }

    #[test]
    fn summary_is_truncated() {
        let text = "x".repeat(2000);
        assert_eq!(summarize(&text).chars().count(), SUMMARY_MAX_CHARS);
    }
}
