//! Configuration for the QA pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{QaError, Result};

/// Configuration parameters for the QA pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QaConfig {
    /// Maximum chunk size in characters (sum of line lengths, separators
    /// not counted). A single line longer than this still becomes its own
    /// chunk rather than being split mid-line.
    pub max_chunk_chars: usize,
    /// Default number of top-ranked chunks to retrieve per question.
    pub top_k: usize,
}

impl Default for QaConfig {
    fn default() -> Self {
        Self { max_chunk_chars: 800, top_k: 5 }
    }
}

impl QaConfig {
    /// Create a new builder for constructing a [`QaConfig`].
    pub fn builder() -> QaConfigBuilder {
        QaConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`QaConfig`].
#[derive(Debug, Clone, Default)]
pub struct QaConfigBuilder {
    config: QaConfig,
}

impl QaConfigBuilder {
    /// Set the maximum chunk size in characters.
    pub fn max_chunk_chars(mut self, chars: usize) -> Self {
        self.config.max_chunk_chars = chars;
        self
    }

    /// Set the default number of top results retrieved per question.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Build the [`QaConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`QaError::Config`] if:
    /// - `max_chunk_chars == 0`
    /// - `top_k == 0`
    pub fn build(self) -> Result<QaConfig> {
        if self.config.max_chunk_chars == 0 {
            return Err(QaError::Config("max_chunk_chars must be greater than zero".to_string()));
        }
        if self.config.top_k == 0 {
            return Err(QaError::Config("top_k must be greater than zero".to_string()));
        }
        Ok(self.config)
    }
}
