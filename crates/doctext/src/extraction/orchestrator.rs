//! Dispatches a document to the right pipeline and absorbs failures

use std::sync::Arc;
use std::time::Duration;

use crate::config::PipelineConfig;
use crate::types::document::{DocumentCategory, SourceDocument};
use crate::types::response::ExtractionResult;

use super::image::ImageOcrPipeline;
use super::legacy::{LegacyDocPipeline, LibreOfficeConverter};
use super::ocr::TesseractEngine;
use super::pdf::{LopdfTextReader, PdfTextPipeline};
use super::render::PopplerRenderer;

/// Routes a classified document to its pipeline and converts every failure
/// into a structured result. No pipeline error surfaces past this boundary.
///
/// Constructed once at startup with its collaborators wired in; holds no
/// per-request state, so one instance serves concurrent requests.
pub struct ExtractionOrchestrator {
    pdf: PdfTextPipeline,
    image: ImageOcrPipeline,
    legacy: LegacyDocPipeline,
}

impl ExtractionOrchestrator {
    /// Wire the default collaborators (lopdf, pdftoppm, tesseract,
    /// LibreOffice) according to the pipeline configuration.
    pub fn new(config: &PipelineConfig) -> Self {
        let ocr = Arc::new(TesseractEngine::new(config.ocr_language.clone()));

        let pdf = PdfTextPipeline::new(
            Arc::new(LopdfTextReader),
            Arc::new(PopplerRenderer::new(config.render_dpi)),
            ocr.clone(),
            config.pdf_ocr_threshold,
        );

        let image = ImageOcrPipeline::new(
            ocr,
            config.image_retry_threshold,
            config.contrast_boost,
            config.blur_sigma,
            config.binarize_threshold,
        );

        let legacy = LegacyDocPipeline::new(Arc::new(LibreOfficeConverter::new(
            Duration::from_secs(config.conversion_timeout_secs),
        )));

        Self::with_pipelines(pdf, image, legacy)
    }

    /// Assemble from explicit pipelines (used by tests to inject fakes)
    pub fn with_pipelines(
        pdf: PdfTextPipeline,
        image: ImageOcrPipeline,
        legacy: LegacyDocPipeline,
    ) -> Self {
        Self { pdf, image, legacy }
    }

    /// Classify and extract. Always returns a structured result: unsupported
    /// types short-circuit without touching any pipeline, and a pipeline
    /// error becomes a `failed` status rather than propagating.
    pub fn process(&self, document: &SourceDocument) -> ExtractionResult {
        let category = document.category();

        let outcome = match category {
            DocumentCategory::Unknown => {
                tracing::info!("Unsupported file type: {}", document.filename);
                return ExtractionResult::unsupported(category);
            }
            DocumentCategory::Pdf => self.pdf.extract(&document.path),
            DocumentCategory::Image => self.image.extract(&document.path),
            DocumentCategory::LegacyDoc => {
                self.legacy.extract(&document.path, &document.filename)
            }
        };

        match outcome {
            Ok(text) => {
                let result = ExtractionResult::from_text(category, text);
                tracing::info!(
                    "Extracted {} chars from '{}' ({})",
                    result.text.len(),
                    document.filename,
                    result.status
                );
                result
            }
            Err(e) => {
                tracing::error!("Extraction failed for '{}': {}", document.filename, e);
                ExtractionResult::failed(category)
            }
        }
    }
}
