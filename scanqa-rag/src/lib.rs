//! # scanqa-rag
//!
//! Document chunking and semantic retrieval core for the scanqa document
//! Q&A service.
//!
//! ## Overview
//!
//! The crate turns a document's extracted text into a searchable in-memory
//! index of chunks and answers free-form questions by ranking those chunks
//! against the question's embedding:
//!
//! ```text
//! raw text ──► Chunker ──► chunks ──► EmbeddingProvider ──► vectors
//!                                          │
//!                          DocumentStore ◄─┘   (whole-index replacement)
//!                                │
//! question ──► EmbeddingProvider ┴──► Retriever ──► top-k chunks ──► AnswerComposer
//! ```
//!
//! Every seam is a trait so backends can be swapped without touching the
//! pipeline: [`Chunker`], [`EmbeddingProvider`], [`DocumentStore`],
//! [`Retriever`], [`AnswerComposer`].
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use scanqa_rag::{InMemoryDocumentStore, MockEmbedder, QaPipeline};
//!
//! let pipeline = QaPipeline::builder()
//!     .embedder(Arc::new(MockEmbedder::new()))
//!     .store(Arc::new(InMemoryDocumentStore::new()))
//!     .build()?;
//!
//! pipeline.ingest("doc-1", "Invoice 2041\nTotal due: 42 EUR").await?;
//! let outcome = pipeline.answer("doc-1", "What is the total?", 5).await?;
//! println!("{} ({} references)", outcome.answer, outcome.references.len());
//! ```
//!
//! The in-memory store lives for the process lifetime; nothing is
//! persisted across restarts.

pub mod chunking;
pub mod composer;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod mock;
pub mod openai;
pub mod pipeline;
pub mod retriever;
pub mod store;

pub use chunking::{Chunker, LineChunker};
pub use composer::{AnswerComposer, StubComposer};
pub use config::QaConfig;
pub use document::{Chunk, DocumentIndex, ScoredChunk};
pub use embedding::EmbeddingProvider;
pub use error::{QaError, Result};
pub use inmemory::InMemoryDocumentStore;
pub use mock::MockEmbedder;
pub use openai::{OpenAiComposer, OpenAiEmbedder};
pub use pipeline::{QaOutcome, QaPipeline, QaPipelineBuilder};
pub use retriever::{CosineRetriever, Retriever};
pub use store::DocumentStore;
