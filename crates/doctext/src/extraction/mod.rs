//! Extraction pipelines and their fallback logic.
//!
//! Each pipeline is self-contained and stateless across invocations: stage
//! failures are absorbed where they happen so a partial success elsewhere in
//! the same document still surfaces, and temporary artifacts are scoped to a
//! [`tempfile::TempDir`] that cleans up on every exit path.

pub mod image;
pub mod legacy;
pub mod ocr;
pub mod orchestrator;
pub mod pdf;
pub mod render;

pub use image::ImageOcrPipeline;
pub use legacy::{DocumentConverter, LegacyDocPipeline, LibreOfficeConverter};
pub use ocr::{OcrEngine, OcrMode, TesseractEngine};
pub use orchestrator::ExtractionOrchestrator;
pub use pdf::{LopdfTextReader, PdfTextPipeline, PdfTextReader};
pub use render::{PageRenderer, PopplerRenderer};
