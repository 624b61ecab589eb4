use std::sync::Arc;

use anyhow::Context;
use scanqa_ocr::{ShellOcrExtractor, TextExtractor};
use scanqa_rag::{
    InMemoryDocumentStore, MockEmbedder, OpenAiComposer, OpenAiEmbedder, QaConfig, QaPipeline,
};
use scanqa_server::{AppState, ServerConfig, router};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::from_env()?;

    let qa_config = QaConfig::builder()
        .max_chunk_chars(config.max_chunk_chars)
        .top_k(config.top_k)
        .build()
        .context("invalid QA configuration")?;

    let embedder: Arc<dyn scanqa_rag::EmbeddingProvider> = match &config.openai_api_key {
        Some(key) => {
            let mut embedder = OpenAiEmbedder::new(key.clone())?;
            if let Some(base_url) = &config.openai_base_url {
                embedder = embedder.with_base_url(base_url.clone());
            }
            if let Some(model) = &config.embedding_model {
                embedder = embedder.with_model(model.clone());
            }
            Arc::new(embedder)
        }
        None => {
            warn!("OPENAI_API_KEY not set; using the offline mock embedder (no semantic ranking)");
            Arc::new(MockEmbedder::new())
        }
    };

    let mut builder = QaPipeline::builder()
        .config(qa_config)
        .embedder(embedder)
        .store(Arc::new(InMemoryDocumentStore::new()));

    match &config.openai_api_key {
        Some(key) => {
            let mut composer = OpenAiComposer::new(key.clone())?;
            if let Some(base_url) = &config.openai_base_url {
                composer = composer.with_base_url(base_url.clone());
            }
            if let Some(model) = &config.chat_model {
                composer = composer.with_model(model.clone());
            }
            builder = builder.composer(Arc::new(composer));
        }
        None => {
            warn!("no answer backend configured; questions get placeholder answers");
            // Builder default: StubComposer.
        }
    }

    let pipeline = Arc::new(builder.build()?);

    let mut extractor = ShellOcrExtractor::new();
    if let Some(language) = &config.ocr_language {
        extractor = extractor.with_language(language.clone());
    }
    let extractor: Arc<dyn TextExtractor> = Arc::new(extractor);

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("creating upload dir {}", config.upload_dir.display()))?;

    let state = Arc::new(AppState::new(pipeline, extractor, config.upload_dir.clone()));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "scanqa server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutting down");
        })
        .await?;

    Ok(())
}
