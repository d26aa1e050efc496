//! Configuration for the extraction service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DoctextConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
    /// Upload storage configuration
    #[serde(default)]
    pub storage: StorageConfig,
    /// Extraction pipeline tuning
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl DoctextConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }

    /// Apply environment overrides (`DOCTEXT_API_KEY`, `DOCTEXT_UPLOAD_DIR`)
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("DOCTEXT_API_KEY") {
            if !key.is_empty() {
                self.auth.api_key = Some(key);
            }
        }
        if let Ok(dir) = std::env::var("DOCTEXT_UPLOAD_DIR") {
            if !dir.is_empty() {
                self.storage.upload_dir = PathBuf::from(dir);
            }
        }
    }

    /// Validate that the configuration is usable at startup
    pub fn validate(&self) -> Result<()> {
        match &self.auth.api_key {
            Some(key) if !key.is_empty() => Ok(()),
            _ => Err(Error::Config(
                "No API key configured; set DOCTEXT_API_KEY or [auth].api_key".to_string(),
            )),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Shared-secret API key checked against the `X-API-Key` header.
    /// Must be set (via config file or `DOCTEXT_API_KEY`) for the server to start.
    pub api_key: Option<String>,
}

/// Upload storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where uploads are spooled while a request is processed
    pub upload_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let upload_dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("doctext")
            .join("uploads");

        Self { upload_dir }
    }
}

/// Extraction pipeline tuning
///
/// The character thresholds are the quality signals that decide when a
/// pipeline escalates to a more expensive strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Minimum trimmed character count from the PDF text layer before
    /// the document is treated as scanned and sent to OCR (default: 100)
    #[serde(default = "default_pdf_ocr_threshold")]
    pub pdf_ocr_threshold: usize,
    /// Minimum trimmed character count from an image OCR pass before
    /// the next fallback attempt runs (default: 50)
    #[serde(default = "default_image_retry_threshold")]
    pub image_retry_threshold: usize,
    /// DPI used when rendering PDF pages to images for OCR (default: 150)
    #[serde(default = "default_render_dpi")]
    pub render_dpi: u32,
    /// OCR language passed to tesseract (default: "eng")
    #[serde(default = "default_ocr_language")]
    pub ocr_language: String,
    /// Contrast boost applied during image enhancement, in percent
    /// (100.0 doubles the deviation from mid-gray)
    #[serde(default = "default_contrast_boost")]
    pub contrast_boost: f32,
    /// Gaussian blur sigma applied to suppress noise before binarization
    #[serde(default = "default_blur_sigma")]
    pub blur_sigma: f32,
    /// Luminance threshold for binarization: pixels above become white,
    /// the rest black (default: 150)
    #[serde(default = "default_binarize_threshold")]
    pub binarize_threshold: u8,
    /// Deadline for a LibreOffice conversion in seconds (default: 30)
    #[serde(default = "default_conversion_timeout")]
    pub conversion_timeout_secs: u64,
}

fn default_pdf_ocr_threshold() -> usize {
    100
}
fn default_image_retry_threshold() -> usize {
    50
}
fn default_render_dpi() -> u32 {
    150
}
fn default_ocr_language() -> String {
    "eng".to_string()
}
fn default_contrast_boost() -> f32 {
    100.0
}
fn default_blur_sigma() -> f32 {
    0.5
}
fn default_binarize_threshold() -> u8 {
    150
}
fn default_conversion_timeout() -> u64 {
    30
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pdf_ocr_threshold: default_pdf_ocr_threshold(),
            image_retry_threshold: default_image_retry_threshold(),
            render_dpi: default_render_dpi(),
            ocr_language: default_ocr_language(),
            contrast_boost: default_contrast_boost(),
            blur_sigma: default_blur_sigma(),
            binarize_threshold: default_binarize_threshold(),
            conversion_timeout_secs: default_conversion_timeout(),
        }
    }
}
