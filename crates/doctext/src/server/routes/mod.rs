//! API routes for the extraction server

pub mod extract;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::HeaderMap,
    routing::{get, post},
    Router,
};

use crate::error::Result;
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(service_info))
        // Upload endpoints carry a larger body limit
        .route(
            "/extract-text",
            post(extract::extract_text).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/extract-text-base64",
            post(extract::extract_text_base64).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route(
            "/batch-extract",
            post(extract::batch_extract).layer(DefaultBodyLimit::max(max_upload_size)),
        )
}

/// Service banner
async fn service_info(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<axum::Json<serde_json::Value>> {
    state.require_api_key(&headers)?;

    Ok(axum::Json(serde_json::json!({
        "name": "doctext",
        "version": env!("CARGO_PKG_VERSION"),
        "message": "Text extraction service is running.",
        "endpoints": {
            "POST /extract-text": "Extract text from an uploaded file (multipart)",
            "POST /extract-text-base64": "Extract text from base64-encoded file data",
            "POST /batch-extract": "Extract text from multiple uploaded files",
            "GET /health": "Liveness check"
        }
    })))
}
