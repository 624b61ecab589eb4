//! Document store trait mapping document ids to their chunk indexes.

use std::sync::Arc;

use async_trait::async_trait;

use crate::document::DocumentIndex;
use crate::error::Result;

/// A storage backend mapping document ids to [`DocumentIndex`]es.
///
/// Implementations hold the process-wide document mapping and are handed
/// to the pipeline by explicit injection; there is no ambient global
/// store. Indexes are replaced as whole units: a `put` for an id that is
/// concurrently being read must leave the reader observing either the old
/// complete index or the new complete index, never a partial mix.
///
/// # Example
///
/// ```rust,ignore
/// use scanqa_rag::{DocumentStore, InMemoryDocumentStore};
///
/// let store = InMemoryDocumentStore::new();
/// store.put("doc-1", index).await?;
/// let snapshot = store.get("doc-1").await?;
/// ```
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store the full index for a document id, replacing any prior entry
    /// for that id as a whole. An empty index is a valid entry.
    async fn put(&self, doc_id: &str, index: DocumentIndex) -> Result<()>;

    /// Fetch a consistent snapshot of a document's index, or `None` for an
    /// unknown id.
    async fn get(&self, doc_id: &str) -> Result<Option<Arc<DocumentIndex>>>;

    /// Evict a document's index. No-op for an unknown id.
    async fn remove(&self, doc_id: &str) -> Result<()>;

    /// Number of documents currently indexed.
    async fn document_count(&self) -> Result<usize>;
}
