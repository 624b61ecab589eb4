//! QA pipeline orchestrator.
//!
//! The [`QaPipeline`] coordinates the full ingest-and-answer workflow by
//! composing an [`EmbeddingProvider`], a [`DocumentStore`], a [`Chunker`],
//! a [`Retriever`], and an [`AnswerComposer`].
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scanqa_rag::{QaPipeline, QaConfig, InMemoryDocumentStore, LineChunker};
//!
//! let pipeline = QaPipeline::builder()
//!     .config(QaConfig::default())
//!     .embedder(Arc::new(my_embedder))
//!     .store(Arc::new(InMemoryDocumentStore::new()))
//!     .build()?;
//!
//! pipeline.ingest("doc-1", &extracted_text).await?;
//! let outcome = pipeline.answer("doc-1", "what is the total?", 5).await?;
//! ```

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::chunking::{Chunker, LineChunker};
use crate::composer::{AnswerComposer, StubComposer};
use crate::config::QaConfig;
use crate::document::{DocumentIndex, ScoredChunk};
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};
use crate::retriever::{CosineRetriever, Retriever};
use crate::store::DocumentStore;

/// Answer returned when retrieval found nothing to ground an answer on.
const NO_CONTENT_ANSWER: &str = "I could not find any content for this document.";

/// The outcome of answering one question.
///
/// Retrieval success and composition success are independent: `references`
/// reports what retrieval offered as context even when the answer backend
/// failed or is unconfigured, so callers can show "context found but
/// answer service unavailable" rather than one collapsed failure.
#[derive(Debug, Clone, Serialize)]
pub struct QaOutcome {
    /// The composed answer, or a clearly-marked placeholder/failure string.
    pub answer: String,
    /// Whether a configured answer backend produced `answer`.
    pub answered: bool,
    /// The chunks offered to the backend as context, most relevant first.
    pub references: Vec<ScoredChunk>,
}

/// The QA pipeline orchestrator.
///
/// Coordinates document ingestion (chunk → embed → store) and question
/// answering (embed → rank → compose). Construct one via
/// [`QaPipeline::builder()`].
pub struct QaPipeline {
    config: QaConfig,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn DocumentStore>,
    chunker: Arc<dyn Chunker>,
    retriever: Arc<dyn Retriever>,
    composer: Arc<dyn AnswerComposer>,
}

impl QaPipeline {
    /// Create a new [`QaPipelineBuilder`].
    pub fn builder() -> QaPipelineBuilder {
        QaPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedder(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedder
    }

    /// Return a reference to the document store.
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Ingest a document's extracted text: chunk → embed → store.
    ///
    /// The stored index replaces any prior index for `doc_id` as a whole.
    /// Text with no extractable content stores an empty index (a valid
    /// state, not an error) and returns 0. Returns the stored chunk count.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding or storage fails. Failure is atomic:
    /// a prior index for `doc_id` stays untouched and no partial index is
    /// ever visible to readers.
    pub async fn ingest(&self, doc_id: &str, raw_text: &str) -> Result<usize> {
        let mut chunks = self.chunker.chunk(raw_text);

        if chunks.is_empty() {
            self.store.put(doc_id, DocumentIndex::default()).await?;
            info!(doc_id, chunk_count = 0, "indexed document with no extractable text");
            return Ok(0);
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();

        let embeddings = self.embedder.embed_batch(&texts).await.map_err(|e| {
            error!(doc_id, error = %e, "embedding failed during ingestion");
            e
        })?;

        if embeddings.len() != chunks.len() {
            return Err(QaError::Pipeline(format!(
                "embedder returned {} vectors for {} chunks of document '{doc_id}'",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimensions = self.embedder.dimensions();
        if embeddings.iter().any(|v| v.len() != dimensions) {
            return Err(QaError::Pipeline(format!(
                "embedder returned vectors of inconsistent dimension for document '{doc_id}' \
                 (expected {dimensions})"
            )));
        }

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        let chunk_count = chunks.len();
        self.store.put(doc_id, DocumentIndex::new(chunks)).await?;
        info!(doc_id, chunk_count, "indexed document");

        Ok(chunk_count)
    }

    /// Retrieve the `top_k` chunks most relevant to `question`.
    ///
    /// An unknown document id, an empty index, or `top_k = 0` yields an
    /// empty result; "no relevant content" is an expected outcome, not a
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns an error if embedding the question fails; the query is
    /// aborted rather than ranked against a garbage vector.
    pub async fn retrieve(
        &self,
        doc_id: &str,
        question: &str,
        top_k: usize,
    ) -> Result<Vec<ScoredChunk>> {
        let Some(index) = self.store.get(doc_id).await? else {
            debug!(doc_id, "no index for document");
            return Ok(Vec::new());
        };

        if index.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }

        let question_vector = self.embedder.embed(question).await.map_err(|e| {
            error!(doc_id, error = %e, "question embedding failed");
            e
        })?;

        let results = self.retriever.retrieve(&index.chunks, &question_vector, top_k);
        debug!(doc_id, result_count = results.len(), "retrieved chunks");
        Ok(results)
    }

    /// Answer a question about a document: retrieve context, then compose.
    ///
    /// Composition failure does not fail the query: the outcome carries a
    /// marked failure answer with `answered = false` while the retrieved
    /// references are still returned.
    ///
    /// # Errors
    ///
    /// Returns an error only when retrieval itself fails (question
    /// embedding or store access).
    pub async fn answer(&self, doc_id: &str, question: &str, top_k: usize) -> Result<QaOutcome> {
        let references = self.retrieve(doc_id, question, top_k).await?;

        if references.is_empty() {
            return Ok(QaOutcome {
                answer: NO_CONTENT_ANSWER.to_string(),
                answered: false,
                references,
            });
        }

        match self.composer.compose(question, &references).await {
            Ok(answer) => {
                let answered = self.composer.is_configured();
                info!(doc_id, answered, reference_count = references.len(), "composed answer");
                Ok(QaOutcome { answer, answered, references })
            }
            Err(e) => {
                warn!(doc_id, backend = self.composer.backend(), error = %e, "composition failed");
                Ok(QaOutcome {
                    answer: format!("The answer service is unavailable: {e}"),
                    answered: false,
                    references,
                })
            }
        }
    }
}

/// Builder for constructing a [`QaPipeline`].
///
/// `embedder` and `store` are required. The chunker defaults to a
/// [`LineChunker`] sized from the config, the retriever to
/// [`CosineRetriever`], and the composer to [`StubComposer`], the
/// explicit "no answer backend configured" state.
#[derive(Default)]
pub struct QaPipelineBuilder {
    config: Option<QaConfig>,
    embedder: Option<Arc<dyn EmbeddingProvider>>,
    store: Option<Arc<dyn DocumentStore>>,
    chunker: Option<Arc<dyn Chunker>>,
    retriever: Option<Arc<dyn Retriever>>,
    composer: Option<Arc<dyn AnswerComposer>>,
}

impl QaPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: QaConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedder(mut self, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Set the document store.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the chunking strategy.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the retrieval strategy.
    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    /// Set the answer composer.
    pub fn composer(mut self, composer: Arc<dyn AnswerComposer>) -> Self {
        self.composer = Some(composer);
        self
    }

    /// Build the [`QaPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if `embedder` or `store` is missing.
    pub fn build(self) -> Result<QaPipeline> {
        let config = self.config.unwrap_or_default();
        let embedder =
            self.embedder.ok_or_else(|| QaError::Config("embedder is required".to_string()))?;
        let store = self.store.ok_or_else(|| QaError::Config("store is required".to_string()))?;
        let chunker =
            self.chunker.unwrap_or_else(|| Arc::new(LineChunker::new(config.max_chunk_chars)));
        let retriever = self.retriever.unwrap_or_else(|| Arc::new(CosineRetriever));
        let composer = self.composer.unwrap_or_else(|| Arc::new(StubComposer));

        Ok(QaPipeline { config, embedder, store, chunker, retriever, composer })
    }
}
