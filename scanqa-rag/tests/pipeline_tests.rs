//! End-to-end pipeline tests with the deterministic mock embedder.

use std::sync::Arc;

use async_trait::async_trait;
use scanqa_rag::composer::AnswerComposer;
use scanqa_rag::document::ScoredChunk;
use scanqa_rag::embedding::EmbeddingProvider;
use scanqa_rag::error::{QaError, Result};
use scanqa_rag::{DocumentStore, InMemoryDocumentStore, MockEmbedder, QaPipeline};

/// An embedding provider whose backend is always unreachable.
struct UnreachableEmbedder;

#[async_trait]
impl EmbeddingProvider for UnreachableEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Err(QaError::Embedding {
            provider: "unreachable".into(),
            message: "connection refused".into(),
        })
    }

    fn dimensions(&self) -> usize {
        32
    }
}

/// An answer backend that always errors.
struct FailingComposer;

#[async_trait]
impl AnswerComposer for FailingComposer {
    fn backend(&self) -> &str {
        "failing"
    }

    async fn compose(&self, _question: &str, _context: &[ScoredChunk]) -> Result<String> {
        Err(QaError::Composer { backend: "failing".into(), message: "boom".into() })
    }
}

fn mock_pipeline(store: Arc<InMemoryDocumentStore>) -> QaPipeline {
    QaPipeline::builder()
        .embedder(Arc::new(MockEmbedder::new()))
        .store(store)
        .build()
        .unwrap()
}

const SAMPLE_TEXT: &str = "Invoice number 2041\n\
                           Issued to ACME Corporation\n\
                           \n\
                           Total due: 42 EUR\n\
                           Payment within 30 days\n";

#[tokio::test]
async fn ingest_then_retrieve_round_trip() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let pipeline = mock_pipeline(store.clone());

    let chunk_count = pipeline.ingest("doc-1", SAMPLE_TEXT).await.unwrap();
    assert!(chunk_count > 0);
    assert_eq!(store.document_count().await.unwrap(), 1);

    let results = pipeline.retrieve("doc-1", "what is the total?", 3).await.unwrap();
    assert!(!results.is_empty());
    assert!(results.len() <= 3);
    for result in &results {
        assert!(!result.text.is_empty());
    }
}

#[tokio::test]
async fn retrieve_unknown_document_returns_empty_not_error() {
    let pipeline = mock_pipeline(Arc::new(InMemoryDocumentStore::new()));
    let results = pipeline.retrieve("no-such-doc", "anything", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn empty_text_stores_a_valid_zero_chunk_index() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let pipeline = mock_pipeline(store.clone());

    let chunk_count = pipeline.ingest("blank-doc", "\n\n   \n").await.unwrap();
    assert_eq!(chunk_count, 0);

    // The document is known but has no content: still an empty result.
    let index = store.get("blank-doc").await.unwrap().unwrap();
    assert!(index.is_empty());
    let results = pipeline.retrieve("blank-doc", "anything", 5).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn reingestion_fully_replaces_the_previous_index() {
    let pipeline = mock_pipeline(Arc::new(InMemoryDocumentStore::new()));

    pipeline.ingest("doc-1", "first version about apples\nred fruit").await.unwrap();
    pipeline.ingest("doc-1", "second version about ships\nblue hulls").await.unwrap();

    let results = pipeline.retrieve("doc-1", "anything at all", 100).await.unwrap();
    assert!(!results.is_empty());
    for result in &results {
        assert!(
            !result.text.contains("apples"),
            "stale chunk from the first ingestion survived: {}",
            result.text
        );
    }
}

#[tokio::test]
async fn embedding_failure_during_ingestion_stores_nothing() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let pipeline = QaPipeline::builder()
        .embedder(Arc::new(UnreachableEmbedder))
        .store(store.clone())
        .build()
        .unwrap();

    let err = pipeline.ingest("doc-1", SAMPLE_TEXT).await.unwrap_err();
    assert!(matches!(err, QaError::Embedding { .. }));
    assert!(store.get("doc-1").await.unwrap().is_none());
}

#[tokio::test]
async fn embedding_failure_leaves_prior_index_untouched() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let good = mock_pipeline(store.clone());
    let bad = QaPipeline::builder()
        .embedder(Arc::new(UnreachableEmbedder))
        .store(store.clone())
        .build()
        .unwrap();

    good.ingest("doc-1", SAMPLE_TEXT).await.unwrap();
    bad.ingest("doc-1", "replacement text").await.unwrap_err();

    // The original index is still served.
    let results = good.retrieve("doc-1", "total", 5).await.unwrap();
    assert!(results.iter().any(|r| r.text.contains("Total due")));
}

#[tokio::test]
async fn question_embedding_failure_aborts_the_query() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let good = mock_pipeline(store.clone());
    let bad = QaPipeline::builder()
        .embedder(Arc::new(UnreachableEmbedder))
        .store(store)
        .build()
        .unwrap();

    good.ingest("doc-1", SAMPLE_TEXT).await.unwrap();
    let err = bad.retrieve("doc-1", "what is the total?", 5).await.unwrap_err();
    assert!(matches!(err, QaError::Embedding { .. }));
}

#[tokio::test]
async fn composer_failure_still_returns_references() {
    let pipeline = QaPipeline::builder()
        .embedder(Arc::new(MockEmbedder::new()))
        .store(Arc::new(InMemoryDocumentStore::new()))
        .composer(Arc::new(FailingComposer))
        .build()
        .unwrap();

    pipeline.ingest("doc-1", SAMPLE_TEXT).await.unwrap();
    let outcome = pipeline.answer("doc-1", "what is the total?", 3).await.unwrap();

    assert!(!outcome.answered);
    assert!(!outcome.references.is_empty());
    assert!(outcome.answer.contains("unavailable"));
}

#[tokio::test]
async fn default_stub_composer_reports_unanswered_with_placeholder() {
    let pipeline = mock_pipeline(Arc::new(InMemoryDocumentStore::new()));

    pipeline.ingest("doc-1", SAMPLE_TEXT).await.unwrap();
    let outcome = pipeline.answer("doc-1", "what is the total?", 3).await.unwrap();

    assert!(!outcome.answered);
    assert!(!outcome.references.is_empty());
    assert!(outcome.answer.contains("what is the total?"));
}

#[tokio::test]
async fn answering_about_unknown_document_reports_no_content() {
    let pipeline = mock_pipeline(Arc::new(InMemoryDocumentStore::new()));
    let outcome = pipeline.answer("no-such-doc", "anything", 3).await.unwrap();

    assert!(!outcome.answered);
    assert!(outcome.references.is_empty());
    assert!(!outcome.answer.is_empty());
}

#[tokio::test]
async fn mock_embedder_is_deterministic_across_calls() {
    let embedder = MockEmbedder::new();
    let a = embedder.embed("hello world").await.unwrap();
    let b = embedder.embed("hello world").await.unwrap();
    let c = embedder.embed("goodbye world").await.unwrap();

    assert_eq!(a, b, "identical text must embed identically");
    assert_ne!(a, c, "distinct text should embed differently");
    assert_eq!(a.len(), embedder.dimensions());
}

#[tokio::test]
async fn concurrent_puts_for_different_documents_do_not_interfere() {
    let store = Arc::new(InMemoryDocumentStore::new());
    let pipeline = Arc::new(mock_pipeline(store.clone()));

    let mut handles = Vec::new();
    for i in 0..8 {
        let pipeline = pipeline.clone();
        handles.push(tokio::spawn(async move {
            let doc_id = format!("doc-{i}");
            let text = format!("document number {i}\nline two of document {i}");
            pipeline.ingest(&doc_id, &text).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.document_count().await.unwrap(), 8);
    for i in 0..8 {
        let results = pipeline.retrieve(&format!("doc-{i}"), "document", 10).await.unwrap();
        assert!(results.iter().all(|r| r.text.contains(&format!("{i}"))));
    }
}
