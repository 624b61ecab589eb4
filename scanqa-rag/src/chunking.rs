//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and its default
//! implementation, [`LineChunker`], which packs trimmed source lines into
//! bounded-size chunks.

use crate::document::Chunk;

/// A strategy for splitting extracted text into chunks.
///
/// Implementations produce [`Chunk`]s with text but no embeddings.
/// Embeddings are attached later by the pipeline. Chunking must be
/// deterministic: identical input always yields identical chunk
/// boundaries.
pub trait Chunker: Send + Sync {
    /// Split raw text into ordered chunks.
    ///
    /// Returns an empty `Vec` if the text has no non-blank lines.
    /// Chunk ids are assigned contiguously starting at 0.
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}

/// Packs consecutive non-blank lines into chunks bounded by a character
/// budget.
///
/// Each input line is trimmed; blank lines are discarded. Lines are
/// accumulated while the cumulative character count (sum of line lengths,
/// join separators not counted) stays within `max_chars`; a line that
/// would push the running total past the budget closes the current chunk
/// and starts the next one. Chunk text joins its lines with `\n`.
///
/// A single line longer than `max_chars` becomes its own oversized chunk;
/// lines are never split mid-line, so OCR output is never truncated or
/// corrupted.
///
/// # Example
///
/// ```rust,ignore
/// use scanqa_rag::LineChunker;
///
/// let chunker = LineChunker::new(800);
/// let chunks = chunker.chunk(&extracted_text);
/// ```
#[derive(Debug, Clone)]
pub struct LineChunker {
    max_chars: usize,
}

impl LineChunker {
    /// Create a new `LineChunker` with the given character budget per chunk.
    pub fn new(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Chunker for LineChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        let mut bodies: Vec<String> = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let line_len = line.chars().count();
            if !current.is_empty() && current_len + line_len > self.max_chars {
                bodies.push(current.join("\n"));
                current.clear();
                current_len = 0;
            }

            current_len += line_len;
            current.push(line);
        }

        if !current.is_empty() {
            bodies.push(current.join("\n"));
        }

        bodies
            .into_iter()
            .enumerate()
            .map(|(id, text)| Chunk { id, text, embedding: Vec::new() })
            .collect()
    }
}
