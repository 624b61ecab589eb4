//! Data types for chunks, document indexes, and retrieval results.

use serde::{Deserialize, Serialize};

/// A bounded-size contiguous slice of a document's extracted text, the
/// atomic unit of retrieval.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Zero-based position of this chunk within its owning document.
    /// Ids are contiguous starting at 0 and reflect source-text order.
    pub id: usize,
    /// The text content of the chunk. Never empty.
    pub text: String,
    /// The vector embedding for this chunk's text. Left empty by the
    /// chunker; attached by the pipeline before the chunk is stored.
    pub embedding: Vec<f32>,
}

/// The per-document collection of chunks used to answer queries.
///
/// One index exists per document id. It is only ever replaced as a whole
/// unit; chunks are never updated individually, so a reader always
/// observes a complete index. An index with no chunks is a valid state:
/// a document with no extractable text.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DocumentIndex {
    /// Chunks in source-text order.
    pub chunks: Vec<Chunk>,
}

impl DocumentIndex {
    /// Create an index from an ordered chunk list.
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Number of chunks in the index.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Whether the document yielded no extractable text.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// A retrieved chunk paired with its similarity to the question vector.
///
/// The score is computed per query and never persisted. Downstream
/// consumers that only need references can serialize `id` and `text`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredChunk {
    /// The chunk's id within its document.
    pub id: usize,
    /// The chunk's text content.
    pub text: String,
    /// Cosine similarity to the question vector (higher is more relevant).
    pub score: f32,
}
