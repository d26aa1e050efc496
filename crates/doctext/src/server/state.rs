//! Application state for the extraction server

use axum::http::HeaderMap;
use std::sync::Arc;

use crate::config::DoctextConfig;
use crate::error::{Error, Result};
use crate::extraction::{
    ExtractionOrchestrator, LibreOfficeConverter, PopplerRenderer, TesseractEngine,
};

/// Shared application state: read-only configuration plus the orchestrator,
/// both constructed once at startup. There is no per-request mutable state.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: DoctextConfig,
    orchestrator: ExtractionOrchestrator,
}

impl AppState {
    /// Create new application state
    pub fn new(config: DoctextConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.storage.upload_dir).map_err(|e| {
            Error::Config(format!(
                "Failed to create upload dir {}: {}",
                config.storage.upload_dir.display(),
                e
            ))
        })?;

        // The service still starts without these tools; the affected
        // fallbacks degrade to empty results at request time.
        if !TesseractEngine::is_available() {
            tracing::warn!("tesseract not found; OCR fallbacks will yield no text");
        }
        if !PopplerRenderer::is_available() {
            tracing::warn!("pdftoppm not found; scanned-PDF OCR will yield no text");
        }
        if !LibreOfficeConverter::is_available() {
            tracing::warn!("libreoffice not found; legacy .doc conversion will yield no text");
        }

        let orchestrator = ExtractionOrchestrator::new(&config.pipeline);
        tracing::info!(
            "Extraction orchestrator initialized (upload dir: {})",
            config.storage.upload_dir.display()
        );

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                orchestrator,
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &DoctextConfig {
        &self.inner.config
    }

    /// Get the extraction orchestrator
    pub fn orchestrator(&self) -> &ExtractionOrchestrator {
        &self.inner.orchestrator
    }

    /// Enforce the shared-secret header check. Runs before any core code.
    pub fn require_api_key(&self, headers: &HeaderMap) -> Result<()> {
        let expected = self
            .inner
            .config
            .auth
            .api_key
            .as_deref()
            .ok_or(Error::Unauthorized)?;

        match headers.get("x-api-key").and_then(|value| value.to_str().ok()) {
            Some(provided) if provided == expected => Ok(()),
            _ => Err(Error::Unauthorized),
        }
    }
}
