//! Chunk ranking by vector similarity.
//!
//! This module provides the [`Retriever`] trait and the default
//! [`CosineRetriever`], a brute-force exact scan. The trait exists so the
//! scan strategy can be swapped (e.g. for an approximate index at larger
//! scale) without changing the retrieval contract.

use std::cmp::Ordering;

use crate::document::{Chunk, ScoredChunk};

/// Added to the similarity denominator so an all-zero vector scores 0.0
/// instead of dividing by zero.
const SIMILARITY_EPSILON: f32 = 1e-8;

/// A strategy for ranking a document's chunks against a question vector.
pub trait Retriever: Send + Sync {
    /// Rank `chunks` by relevance to the question vector and return at
    /// most `top_k` results, most relevant first.
    ///
    /// Equal scores keep ingestion order, so repeated identical queries
    /// return identical orderings. `top_k = 0` yields an empty result.
    fn retrieve(&self, chunks: &[Chunk], question: &[f32], top_k: usize) -> Vec<ScoredChunk>;
}

/// Compute cosine similarity between two vectors.
///
/// Mismatched dimensions are a contract violation (every vector in the
/// system shares one dimensionality for the process lifetime) and abort
/// rather than producing a silently wrong ranking.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "embedding dimensions must match ({} vs {})", a.len(), b.len());

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    dot / (norm_a * norm_b + SIMILARITY_EPSILON)
}

/// Brute-force exact retriever using cosine similarity.
///
/// Scores every chunk, sorts descending with a stable sort, and truncates
/// to `top_k`. Exact scan is the design target for the modest in-memory
/// chunk counts this service holds per document.
#[derive(Debug, Clone, Copy, Default)]
pub struct CosineRetriever;

impl Retriever for CosineRetriever {
    fn retrieve(&self, chunks: &[Chunk], question: &[f32], top_k: usize) -> Vec<ScoredChunk> {
        if top_k == 0 || chunks.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<ScoredChunk> = chunks
            .iter()
            .map(|chunk| ScoredChunk {
                id: chunk.id,
                text: chunk.text.clone(),
                score: cosine_similarity(question, &chunk.embedding),
            })
            .collect();

        // sort_by is stable: ties keep ingestion order.
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(top_k);
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_vector_scores_zero_instead_of_dividing_by_zero() {
        let sim = cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]);
        assert_eq!(sim, 0.0);
    }

    #[test]
    #[should_panic(expected = "embedding dimensions must match")]
    fn mismatched_dimensions_abort() {
        cosine_similarity(&[1.0, 0.0], &[1.0, 0.0, 0.0]);
    }
}
