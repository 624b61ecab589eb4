//! OpenAI-compatible embedding and answering backends.
//!
//! Both clients call the OpenAI REST surface directly via `reqwest`, and
//! accept a base-URL override so any OpenAI-compatible server (Ollama,
//! vLLM, a corporate gateway) can stand in for the hosted API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::composer::{AnswerComposer, render_context};
use crate::document::ScoredChunk;
use crate::embedding::EmbeddingProvider;
use crate::error::{QaError, Result};

/// The default API base for the hosted OpenAI endpoints.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// The default embedding model.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// The default dimensionality for `text-embedding-3-small`.
const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;

/// The default chat model used for answer composition.
const DEFAULT_CHAT_MODEL: &str = "gpt-4o-mini";

/// System prompt instructing the model to stay inside the retrieved context.
const COMPOSER_SYSTEM_PROMPT: &str = "You answer questions about a scanned document. \
     Use only the provided context passages, which are labeled [chunk N]. \
     If the context does not contain the answer, say so plainly.";

/// Extract a human-readable message from an OpenAI error body, falling
/// back to the raw body text.
fn api_error_detail(body: String) -> String {
    serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error.message).unwrap_or(body)
}

// ── OpenAI API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

// ── Embedding provider ─────────────────────────────────────────────

/// An [`EmbeddingProvider`] backed by an OpenAI-compatible
/// `/embeddings` endpoint.
///
/// # Configuration
///
/// - `model` – defaults to `text-embedding-3-small`.
/// - `base_url` – defaults to the hosted API; override for local servers.
/// - `api_key` – from the constructor or the `OPENAI_API_KEY` environment
///   variable.
///
/// # Example
///
/// ```rust,ignore
/// use scanqa_rag::openai::OpenAiEmbedder;
///
/// let embedder = OpenAiEmbedder::new("sk-...")?
///     .with_base_url("http://localhost:11434/v1");
/// let vector = embedder.embed("hello world").await?;
/// ```
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    dimensions: usize,
}

impl OpenAiEmbedder {
    /// Create a new embedder with the given API key and default model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(QaError::Embedding {
                provider: "openai".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_API_BASE.into(),
            model: DEFAULT_EMBEDDING_MODEL.into(),
            dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        })
    }

    /// Create a new embedder using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| QaError::Embedding {
            provider: "openai".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Override the API base URL (trailing slash stripped).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the embedding model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Declare the dimensionality the configured model produces.
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| QaError::Embedding {
            provider: "openai".into(),
            message: "API returned empty response".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(batch_size = texts.len(), model = %self.model, "embedding batch");

        let request_body = EmbeddingRequest { model: &self.model, input: texts.to_vec() };

        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "embedding request failed");
                QaError::Embedding {
                    provider: "openai".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = api_error_detail(response.text().await.unwrap_or_default());
            error!(%status, "embedding API error");
            return Err(QaError::Embedding {
                provider: "openai".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let embedding_response: EmbeddingResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse embedding response");
            QaError::Embedding {
                provider: "openai".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        if embedding_response.data.len() != texts.len() {
            return Err(QaError::Embedding {
                provider: "openai".into(),
                message: format!(
                    "API returned {} vectors for {} inputs",
                    embedding_response.data.len(),
                    texts.len()
                ),
            });
        }

        Ok(embedding_response.data.into_iter().map(|d| d.embedding).collect())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

// ── Answer composer ────────────────────────────────────────────────

/// An [`AnswerComposer`] backed by an OpenAI-compatible
/// `/chat/completions` endpoint.
///
/// The retrieved chunks are rendered with `[chunk N]` markers (see
/// [`render_context`]) and passed as the user message together with the
/// question.
pub struct OpenAiComposer {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiComposer {
    /// Create a new composer with the given API key and default chat model.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.is_empty() {
            return Err(QaError::Composer {
                backend: "openai".into(),
                message: "API key must not be empty".into(),
            });
        }

        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_API_BASE.into(),
            model: DEFAULT_CHAT_MODEL.into(),
        })
    }

    /// Create a new composer using the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| QaError::Composer {
            backend: "openai".into(),
            message: "OPENAI_API_KEY environment variable not set".into(),
        })?;
        Self::new(api_key)
    }

    /// Override the API base URL (trailing slash stripped).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the chat model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl AnswerComposer for OpenAiComposer {
    fn backend(&self) -> &str {
        "openai"
    }

    async fn compose(&self, question: &str, context: &[ScoredChunk]) -> Result<String> {
        debug!(model = %self.model, context_chunks = context.len(), "composing answer");

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage { role: "system", content: COMPOSER_SYSTEM_PROMPT.to_string() },
                ChatMessage {
                    role: "user",
                    content: format!(
                        "Context:\n\n{}\n\nQuestion: {question}",
                        render_context(context)
                    ),
                },
            ],
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "composer request failed");
                QaError::Composer {
                    backend: "openai".into(),
                    message: format!("request failed: {e}"),
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = api_error_detail(response.text().await.unwrap_or_default());
            error!(%status, "composer API error");
            return Err(QaError::Composer {
                backend: "openai".into(),
                message: format!("API returned {status}: {detail}"),
            });
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = %e, "failed to parse composer response");
            QaError::Composer {
                backend: "openai".into(),
                message: format!("failed to parse response: {e}"),
            }
        })?;

        chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| QaError::Composer {
                backend: "openai".into(),
                message: "API returned no answer content".into(),
            })
    }
}
