//! OCR engine boundary (tesseract)

use std::path::Path;
use std::process::Command;

use crate::error::{Error, Result};

/// Engine configuration for one OCR attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OcrMode {
    /// Default engine settings
    Document,
    /// Uniform block segmentation, tuned for sparse/structured layouts
    SparseBlock,
}

/// Boundary to the OCR engine: a raster image in, recognized text out.
pub trait OcrEngine: Send + Sync {
    fn recognize(&self, image: &Path, mode: OcrMode) -> Result<String>;
}

/// OCR via the tesseract CLI
pub struct TesseractEngine {
    language: String,
}

impl TesseractEngine {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Check if tesseract is available
    pub fn is_available() -> bool {
        Command::new("tesseract")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &Path, mode: OcrMode) -> Result<String> {
        let mut cmd = Command::new("tesseract");
        cmd.arg(image)
            .arg("stdout")
            .args(["-l", &self.language]);

        if mode == OcrMode::SparseBlock {
            cmd.args(["--oem", "3", "--psm", "6"]);
        }

        let output = cmd
            .output()
            .map_err(|e| Error::external_tool("tesseract", format!("failed to spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::external_tool(
                "tesseract",
                format!("exit status {}: {}", output.status, stderr.trim()),
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
