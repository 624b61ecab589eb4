//! HTTP routes: document upload, listing, and question answering.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{DefaultBodyLimit, Multipart, Path as UrlPath, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use scanqa_ocr::OcrError;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use uuid::Uuid;

use crate::state::{AppState, DocumentRecord, summarize};

/// Upload size cap. Scanned PDFs run large; 50 MiB is generous for the
/// single-document flow this service supports.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Question-answering request body.
#[derive(Debug, Deserialize)]
pub struct QaRequest {
    /// The free-form question.
    pub question: String,
    /// Optional override for the number of context chunks retrieved.
    #[serde(default)]
    pub top_k: Option<usize>,
}

/// A context chunk reference offered to the answer backend.
#[derive(Debug, Serialize)]
pub struct ChunkRef {
    /// Chunk id within the document.
    pub id: usize,
    /// Chunk text.
    pub text: String,
}

/// Question-answering response body.
///
/// `answered` and `references` report composition and retrieval outcomes
/// separately: a failed or unconfigured answer backend still returns the
/// retrieved references alongside a placeholder answer.
#[derive(Debug, Serialize)]
pub struct QaResponse {
    /// The answer, or a clearly-marked placeholder.
    pub answer: String,
    /// Whether a configured answer backend produced the answer.
    pub answered: bool,
    /// The chunks offered as context, most relevant first.
    pub references: Vec<ChunkRef>,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/documents", post(upload_document).get(list_documents))
        .route("/documents/{doc_id}", get(get_document))
        .route("/documents/{doc_id}/qa", post(ask_question))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// POST /documents - multipart upload, OCR, and indexing.
///
/// Extraction or indexing failure leaves nothing registered: the document
/// either becomes fully queryable or the upload fails as a whole.
pub async fn upload_document(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentRecord>), (StatusCode, String)> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (StatusCode::BAD_REQUEST, format!("invalid multipart body: {e}"))
    })? {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or("upload.bin").to_string();
            let data = field.bytes().await.map_err(|e| {
                (StatusCode::BAD_REQUEST, format!("failed to read upload: {e}"))
            })?;
            upload = Some((filename, data));
            break;
        }
    }
    let Some((filename, data)) = upload else {
        return Err((StatusCode::BAD_REQUEST, "missing 'file' field".to_string()));
    };

    let doc_id = Uuid::new_v4().to_string();
    let extension =
        Path::new(&filename).extension().and_then(|e| e.to_str()).unwrap_or("bin");
    let saved_path = state.upload_dir.join(format!("{doc_id}.{extension}"));

    tokio::fs::create_dir_all(&state.upload_dir).await.map_err(|e| {
        error!(error = %e, "failed to create upload directory");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to store upload".to_string())
    })?;
    tokio::fs::write(&saved_path, &data).await.map_err(|e| {
        error!(error = %e, "failed to save upload");
        (StatusCode::INTERNAL_SERVER_ERROR, "failed to store upload".to_string())
    })?;

    let text = state.extractor.extract(&saved_path).await.map_err(|e| match e {
        OcrError::UnsupportedFormat(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, e.to_string()),
        e => {
            error!(doc_id, error = %e, "text extraction failed");
            (StatusCode::BAD_GATEWAY, format!("text extraction failed: {e}"))
        }
    })?;

    let chunk_count = state.pipeline.ingest(&doc_id, &text).await.map_err(|e| {
        error!(doc_id, error = %e, "indexing failed");
        (StatusCode::BAD_GATEWAY, format!("document indexing failed: {e}"))
    })?;

    let record = DocumentRecord {
        id: doc_id.clone(),
        filename,
        summary: summarize(&text),
        chunk_count,
        uploaded_at: Utc::now(),
    };
    state.registry.write().await.insert(doc_id.clone(), record.clone());

    info!(doc_id, chunk_count, "document uploaded");
    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /documents - all registered documents, newest first.
pub async fn list_documents(State(state): State<Arc<AppState>>) -> Json<Vec<DocumentRecord>> {
    let registry = state.registry.read().await;
    let mut records: Vec<DocumentRecord> = registry.values().cloned().collect();
    records.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at).then_with(|| a.id.cmp(&b.id)));
    Json(records)
}

/// GET /documents/{doc_id} - one document's upload record.
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    UrlPath(doc_id): UrlPath<String>,
) -> Result<Json<DocumentRecord>, (StatusCode, String)> {
    let registry = state.registry.read().await;
    match registry.get(&doc_id) {
        Some(record) => Ok(Json(record.clone())),
        None => Err((StatusCode::NOT_FOUND, "document not found".to_string())),
    }
}

/// POST /documents/{doc_id}/qa - answer a question about one document.
pub async fn ask_question(
    State(state): State<Arc<AppState>>,
    UrlPath(doc_id): UrlPath<String>,
    Json(request): Json<QaRequest>,
) -> Result<Json<QaResponse>, (StatusCode, String)> {
    if !state.registry.read().await.contains_key(&doc_id) {
        return Err((StatusCode::NOT_FOUND, "document not found".to_string()));
    }
    if request.question.trim().is_empty() {
        return Err((StatusCode::BAD_REQUEST, "question must not be empty".to_string()));
    }

    let top_k = request.top_k.unwrap_or(state.pipeline.config().top_k);

    let outcome = state.pipeline.answer(&doc_id, &request.question, top_k).await.map_err(|e| {
        error!(doc_id, error = %e, "question answering failed");
        (StatusCode::BAD_GATEWAY, format!("question answering failed: {e}"))
    })?;

    Ok(Json(QaResponse {
        answer: outcome.answer,
        answered: outcome.answered,
        references: outcome
            .references
            .into_iter()
            .map(|r| ChunkRef { id: r.id, text: r.text })
            .collect(),
    }))
}
