//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// The same provider instance must serve both chunk batches (ingestion)
/// and single questions (query time) so that similarity comparisons are
/// meaningful. All vectors produced by a provider have the fixed
/// dimensionality reported by [`dimensions`](EmbeddingProvider::dimensions).
///
/// Callers must treat any embedding failure as "document not indexed" /
/// "query aborted": partial or zero vectors are never stored, since they
/// would silently corrupt every future similarity ranking.
///
/// # Example
///
/// ```rust,ignore
/// use scanqa_rag::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs, one vector
    /// per input, in input order.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially for each input and fails on the first error, so a
    /// failed batch never yields a partial result. Override this method if
    /// the backend supports native batch embedding.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
