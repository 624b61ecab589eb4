//! In-memory document store.
//!
//! This module provides [`InMemoryDocumentStore`], the process-lifetime
//! store backing the service: a `HashMap` protected by a
//! `tokio::sync::RwLock`, with each index behind an `Arc` so readers get
//! cheap consistent snapshots.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::DocumentIndex;
use crate::error::Result;
use crate::store::DocumentStore;

/// An in-memory [`DocumentStore`] keyed by document id.
///
/// `put` swaps the `Arc` for the whole index under the write lock, so a
/// concurrent `get` observes either the previous complete index or the new
/// one, never a half-written entry. Puts for different document ids only
/// contend on the map lock, never on each other's data. Contents live for
/// the process lifetime; nothing is persisted across restarts.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Arc<DocumentIndex>>>,
}

impl InMemoryDocumentStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn put(&self, doc_id: &str, index: DocumentIndex) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.insert(doc_id.to_string(), Arc::new(index));
        Ok(())
    }

    async fn get(&self, doc_id: &str) -> Result<Option<Arc<DocumentIndex>>> {
        let documents = self.documents.read().await;
        Ok(documents.get(doc_id).cloned())
    }

    async fn remove(&self, doc_id: &str) -> Result<()> {
        let mut documents = self.documents.write().await;
        documents.remove(doc_id);
        Ok(())
    }

    async fn document_count(&self) -> Result<usize> {
        let documents = self.documents.read().await;
        Ok(documents.len())
    }
}
