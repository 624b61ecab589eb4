//! # scanqa-server
//!
//! HTTP presentation layer for the scanqa OCR document Q&A service.
//!
//! The server wires the retrieval core ([`scanqa_rag`]) to the OCR
//! extractor ([`scanqa_ocr`]) behind a small JSON API:
//!
//! - `POST /documents` - multipart upload; OCR, chunk, embed, index
//! - `GET /documents` - list uploaded documents
//! - `GET /documents/{id}` - one document's record
//! - `POST /documents/{id}/qa` - answer a question about a document
//!
//! All state (pipeline, extractor, registry) is constructed at startup
//! and injected through [`AppState`]; handlers hold no globals.

pub mod config;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use routes::{ChunkRef, QaRequest, QaResponse, router};
pub use state::{AppState, DocumentRecord};
