//! Error types for the `scanqa-rag` crate.

use thiserror::Error;

/// Errors that can occur in ingestion and question answering.
///
/// Two conditions deliberately have no variant here: a document with no
/// extractable text is stored as an empty index, and a query against an
/// unknown document id returns an empty result set. Both are valid
/// outcomes the caller interprets, not failures.
#[derive(Debug, Error)]
pub enum QaError {
    /// The embedding backend was unreachable or returned an error.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// The answer backend was unreachable or returned an error.
    #[error("Composer error ({backend}): {message}")]
    Composer {
        /// The answer backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the document store backend.
    #[error("Store error ({backend}): {message}")]
    Store {
        /// The store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An error in the ingest/answer pipeline orchestration.
    #[error("Pipeline error: {0}")]
    Pipeline(String),
}

/// A convenience result type for QA operations.
pub type Result<T> = std::result::Result<T, QaError>;
