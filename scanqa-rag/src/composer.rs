//! Answer composition over retrieved context.
//!
//! The [`AnswerComposer`] trait is the seam to the external answering
//! backend: given a question and the retrieved chunks, it produces an
//! answer string. The retrieval layer keeps the offered chunk ids
//! available regardless of what the backend does with them.

use async_trait::async_trait;

use crate::document::ScoredChunk;
use crate::error::Result;

/// A backend that composes an answer from a question and retrieved context.
#[async_trait]
pub trait AnswerComposer: Send + Sync {
    /// Short name of the backend, for logs and error context.
    fn backend(&self) -> &str;

    /// Whether a real answering backend is wired up. The degraded
    /// placeholder composer reports `false` so callers can surface
    /// composition and retrieval outcomes separately.
    fn is_configured(&self) -> bool {
        true
    }

    /// Compose an answer to `question` from the retrieved chunks.
    ///
    /// Implementations must not partially apply: on failure they return an
    /// error and the caller substitutes a clearly-marked failure answer
    /// while still reporting the retrieved references.
    async fn compose(&self, question: &str, context: &[ScoredChunk]) -> Result<String>;
}

/// Serialize retrieved chunks into a context block with per-chunk markers.
///
/// Each chunk is introduced by a `[chunk N]` header and chunks are
/// separated by blank lines, so the backend can attribute parts of its
/// answer to specific chunks if it chooses.
pub fn render_context(context: &[ScoredChunk]) -> String {
    context
        .iter()
        .map(|chunk| format!("[chunk {}]\n{}", chunk.id, chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// The unconfigured/degraded answering mode: a fixed-format placeholder
/// that quotes the question and the most relevant passage found.
///
/// Reports `is_configured() == false`: selecting this composer is the
/// explicit "no answer backend" state, not an error path, and clients see
/// retrieval results with the placeholder answer instead of a failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubComposer;

/// Longest excerpt of the top passage quoted in the placeholder answer.
const EXCERPT_CHARS: usize = 300;

#[async_trait]
impl AnswerComposer for StubComposer {
    fn backend(&self) -> &str {
        "stub"
    }

    fn is_configured(&self) -> bool {
        false
    }

    async fn compose(&self, question: &str, context: &[ScoredChunk]) -> Result<String> {
        let excerpt: String = context
            .first()
            .map(|chunk| chunk.text.chars().take(EXCERPT_CHARS).collect())
            .unwrap_or_default();

        Ok(format!(
            "No answer backend is configured. You asked: \"{question}\". \
             The most relevant passage found was:\n\n{excerpt}"
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scored(id: usize, text: &str) -> ScoredChunk {
        ScoredChunk { id, text: text.to_string(), score: 0.0 }
    }

    #[test]
    fn context_markers_preserve_chunk_boundaries() {
        let rendered = render_context(&[scored(0, "first passage"), scored(3, "second passage")]);
        assert_eq!(rendered, "[chunk 0]\nfirst passage\n\n[chunk 3]\nsecond passage");
    }

    #[tokio::test]
    async fn stub_composer_quotes_question_and_top_passage() {
        let answer = StubComposer
            .compose("what is the total?", &[scored(0, "Total due: 42 EUR")])
            .await
            .unwrap();
        assert!(answer.contains("what is the total?"));
        assert!(answer.contains("Total due: 42 EUR"));
        assert!(!StubComposer.is_configured());
    }
}
