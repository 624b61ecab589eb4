//! Deterministic mock embedding provider for tests and offline runs.

use async_trait::async_trait;

use crate::embedding::EmbeddingProvider;
use crate::error::Result;

/// Default dimensionality for mock embeddings.
const DEFAULT_DIMENSIONS: usize = 32;

/// An [`EmbeddingProvider`] that derives vectors from a hash of the input
/// text. No network, no model weights.
///
/// Identical text always yields an identical vector, so retrieval tests
/// are fully deterministic; distinct texts yield distinct vectors with
/// overwhelming probability. The vectors carry no semantic signal; this
/// provider exists for plumbing tests and for running the service without
/// an embedding backend, not for meaningful ranking.
#[derive(Debug, Clone)]
pub struct MockEmbedder {
    dimensions: usize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self { dimensions: DEFAULT_DIMENSIONS }
    }
}

impl MockEmbedder {
    /// Create a mock embedder producing vectors of the default dimension.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock embedder producing vectors of the given dimension.
    pub fn with_dimensions(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

/// FNV-1a, the seed for the per-text generator.
fn fnv1a(text: &str) -> u64 {
    let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
    for byte in text.bytes() {
        hash ^= u64::from(byte);
        hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
    }
    hash
}

/// xorshift64 step; cheap and stateless across calls.
fn next_state(state: u64) -> u64 {
    let mut x = state;
    x ^= x << 13;
    x ^= x >> 7;
    x ^= x << 17;
    x
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut state = fnv1a(text).max(1);
        let mut vector = Vec::with_capacity(self.dimensions);
        for _ in 0..self.dimensions {
            state = next_state(state);
            // Map the high 24 bits onto [-1, 1].
            let unit = (state >> 40) as f32 / (1u64 << 24) as f32;
            vector.push(unit * 2.0 - 1.0);
        }
        Ok(vector)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
