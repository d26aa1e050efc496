//! Text extraction endpoints

use axum::{
    extract::{Multipart, State},
    http::HeaderMap,
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use uuid::Uuid;

use crate::config::DoctextConfig;
use crate::error::{Error, Result};
use crate::types::document::SourceDocument;
use crate::types::response::{
    Base64ExtractRequest, BatchExtractResponse, BatchFileResult, ExtractResponse,
    ExtractionResult,
};

use crate::server::state::AppState;

/// POST /extract-text - Extract text from one uploaded file
pub async fn extract_text(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<ExtractResponse>> {
    state.require_api_key(&headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::upload(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::upload(format!("Failed to read file: {}", e)))?;

        tracing::info!("Received file: {} ({} bytes)", filename, data.len());

        let result = run_extraction(&state, &filename, content_type, &data).await?;
        return Ok(Json(ExtractResponse::new(filename, result)));
    }

    Err(Error::upload("multipart request contained no file field"))
}

/// POST /extract-text-base64 - Extract text from base64-encoded file data
pub async fn extract_text_base64(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<Base64ExtractRequest>,
) -> Result<Json<ExtractResponse>> {
    state.require_api_key(&headers)?;

    tracing::info!("Received base64 data for file: {}", request.filename);

    let data = BASE64
        .decode(request.base64_data.trim())
        .map_err(|e| Error::upload(format!("Invalid base64 data: {}", e)))?;

    let result =
        run_extraction(&state, &request.filename, request.content_type.clone(), &data).await?;
    Ok(Json(ExtractResponse::new(request.filename, result)))
}

/// POST /batch-extract - Extract text from multiple uploaded files.
/// One file's failure never aborts the rest of the batch.
pub async fn batch_extract(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<BatchExtractResponse>> {
    state.require_api_key(&headers)?;

    let mut results = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::upload(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(|s| s.to_string()) else {
            continue;
        };
        let content_type = field.content_type().map(|s| s.to_string());

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => {
                results.push(BatchFileResult::from_error(
                    filename,
                    format!("Failed to read file: {}", e),
                ));
                continue;
            }
        };

        tracing::info!("Batch file: {} ({} bytes)", filename, data.len());

        match run_extraction(&state, &filename, content_type, &data).await {
            Ok(result) => results.push(BatchFileResult::from_result(filename, result)),
            Err(e) => {
                tracing::error!("Batch extraction failed: {}", e);
                results.push(BatchFileResult::from_error(filename, e.to_string()));
            }
        }
    }

    Ok(Json(BatchExtractResponse { results }))
}

/// Spool the upload, run the orchestrator on a blocking worker, and make
/// sure the spooled file is gone before the response leaves.
async fn run_extraction(
    state: &AppState,
    filename: &str,
    content_type: Option<String>,
    data: &[u8],
) -> Result<ExtractionResult> {
    let spool = spool_upload(state.config(), filename, data)?;

    let mut document = SourceDocument::new(spool.path().to_path_buf(), filename);
    if let Some(content_type) = content_type {
        document = document.with_content_type(content_type);
    }
    let category = document.category();

    // Pipelines are synchronous and may block on external processes; give
    // each request its own blocking worker so it cannot stall the runtime.
    let worker_state = state.clone();
    let result =
        match tokio::task::spawn_blocking(move || worker_state.orchestrator().process(&document))
            .await
        {
            Ok(result) => result,
            Err(e) => {
                tracing::error!("Extraction task panicked for '{}': {}", filename, e);
                ExtractionResult::failed(category)
            }
        };

    drop(spool);
    Ok(result)
}

/// Write the upload into the storage dir under a fresh UUID name, keeping
/// the declared extension for tools that sniff it. The file is removed when
/// the returned handle drops, on every exit path.
fn spool_upload(config: &DoctextConfig, filename: &str, data: &[u8]) -> Result<NamedTempFile> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default();

    let mut file = tempfile::Builder::new()
        .prefix(&format!("{}-", Uuid::new_v4().simple()))
        .suffix(&extension)
        .tempfile_in(&config.storage.upload_dir)?;
    file.write_all(data)?;
    file.flush()?;

    Ok(file)
}
