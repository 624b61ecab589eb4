//! Server configuration from environment variables.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Runtime settings for the server binary.
///
/// All settings come from the environment; unset optional backends fall
/// back to the offline mock embedder and the placeholder answer composer,
/// so the service runs without any external dependency.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind, `SCANQA_BIND` (default `127.0.0.1:8080`).
    pub bind_addr: String,
    /// Directory for uploaded files, `SCANQA_UPLOAD_DIR` (default `uploads`).
    pub upload_dir: PathBuf,
    /// Chunk character budget, `SCANQA_MAX_CHUNK_CHARS` (default 800).
    pub max_chunk_chars: usize,
    /// Default top-k per question, `SCANQA_TOP_K` (default 5).
    pub top_k: usize,
    /// API key for the OpenAI-compatible backends, `OPENAI_API_KEY`.
    /// Unset selects the mock embedder and the stub composer.
    pub openai_api_key: Option<String>,
    /// Base URL override for OpenAI-compatible servers, `SCANQA_OPENAI_BASE_URL`.
    pub openai_base_url: Option<String>,
    /// Embedding model override, `SCANQA_EMBEDDING_MODEL`.
    pub embedding_model: Option<String>,
    /// Chat model override for answer composition, `SCANQA_CHAT_MODEL`.
    pub chat_model: Option<String>,
    /// Tesseract language override, `SCANQA_OCR_LANGUAGE`.
    pub ocr_language: Option<String>,
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

impl ServerConfig {
    /// Read the configuration from the environment.
    pub fn from_env() -> Result<Self> {
        let max_chunk_chars = match optional("SCANQA_MAX_CHUNK_CHARS") {
            Some(raw) => raw.parse().context("SCANQA_MAX_CHUNK_CHARS must be a positive integer")?,
            None => 800,
        };
        let top_k = match optional("SCANQA_TOP_K") {
            Some(raw) => raw.parse().context("SCANQA_TOP_K must be a positive integer")?,
            None => 5,
        };

        Ok(Self {
            bind_addr: optional("SCANQA_BIND").unwrap_or_else(|| "127.0.0.1:8080".to_string()),
            upload_dir: optional("SCANQA_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_chunk_chars,
            top_k,
            openai_api_key: optional("OPENAI_API_KEY"),
            openai_base_url: optional("SCANQA_OPENAI_BASE_URL"),
            embedding_model: optional("SCANQA_EMBEDDING_MODEL"),
            chat_model: optional("SCANQA_CHAT_MODEL"),
            ocr_language: optional("SCANQA_OCR_LANGUAGE"),
        })
    }
}
