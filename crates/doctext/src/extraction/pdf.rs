//! PDF text extraction with OCR fallback for scanned documents

use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use crate::error::{Error, Result};

use super::ocr::{OcrEngine, OcrMode};
use super::render::PageRenderer;

/// Boundary to the PDF text layer: page count and per-page text.
///
/// A page that cannot be read yields an empty string for that page;
/// a document that cannot be opened at all is a wholesale failure.
pub trait PdfTextReader: Send + Sync {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>>;
}

/// Text-layer reading via lopdf
pub struct LopdfTextReader;

impl PdfTextReader for LopdfTextReader {
    fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
        let doc = lopdf::Document::load(path).map_err(|e| {
            Error::file_parse(path.display().to_string(), format!("failed to load PDF: {}", e))
        })?;

        let pages = doc.get_pages();
        let mut texts = Vec::with_capacity(pages.len());
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(text) => texts.push(text),
                Err(e) => {
                    tracing::debug!("Could not extract text from page {}: {}", page_number, e);
                    texts.push(String::new());
                }
            }
        }

        Ok(texts)
    }
}

/// PDF extraction pipeline.
///
/// Reads the embedded text layer first; when that yields fewer than
/// `ocr_threshold` trimmed characters the document is treated as likely
/// scanned and every page is rendered and OCRed. Whichever result is
/// strictly longer wins, with ties going to the cheaper direct extraction.
pub struct PdfTextPipeline {
    reader: Arc<dyn PdfTextReader>,
    renderer: Arc<dyn PageRenderer>,
    ocr: Arc<dyn OcrEngine>,
    ocr_threshold: usize,
}

impl PdfTextPipeline {
    pub fn new(
        reader: Arc<dyn PdfTextReader>,
        renderer: Arc<dyn PageRenderer>,
        ocr: Arc<dyn OcrEngine>,
        ocr_threshold: usize,
    ) -> Self {
        Self {
            reader,
            renderer,
            ocr,
            ocr_threshold,
        }
    }

    /// Extract text from a PDF. Stage failures degrade to empty
    /// contributions; the pipeline itself only errors on infrastructure
    /// problems (missing input, no temp space).
    pub fn extract(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(Error::internal(format!(
                "input file does not exist: {}",
                path.display()
            )));
        }

        let direct = match self.reader.page_texts(path) {
            Ok(pages) => join_pages(&pages),
            Err(e) => {
                tracing::warn!("Direct PDF text extraction failed: {}", e);
                String::new()
            }
        };

        let direct_len = direct.trim().chars().count();
        if direct_len >= self.ocr_threshold {
            return Ok(direct.trim().to_string());
        }

        tracing::info!(
            "Only {} chars in the text layer, trying OCR for possibly scanned PDF",
            direct_len
        );

        let ocr = match self.ocr_pages(path) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("OCR fallback failed: {}", e);
                String::new()
            }
        };

        // Strictly longer wins; a tie keeps the direct extraction, which is
        // cheaper and typically cleaner.
        if ocr.trim().chars().count() > direct_len {
            Ok(ocr.trim().to_string())
        } else {
            Ok(direct.trim().to_string())
        }
    }

    /// Render every page and OCR the images. The rendered images live in a
    /// temp dir that is removed when this function returns, on every path.
    fn ocr_pages(&self, path: &Path) -> Result<String> {
        let workdir = TempDir::new()?;
        let images = self.renderer.render_pages(path, workdir.path())?;

        let mut pages = Vec::with_capacity(images.len());
        for (index, image) in images.iter().enumerate() {
            match self.ocr.recognize(image, OcrMode::Document) {
                Ok(text) => pages.push(text),
                Err(e) => {
                    tracing::warn!("OCR failed on page {}: {}", index + 1, e);
                    pages.push(String::new());
                }
            }
        }

        Ok(join_pages(&pages))
    }
}

/// Concatenate non-empty page texts with a blank line between pages,
/// preserving page boundaries for downstream readability.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedReader {
        pages: Vec<String>,
        calls: AtomicUsize,
    }

    impl FixedReader {
        fn new(pages: &[&str]) -> Arc<Self> {
            Arc::new(Self {
                pages: pages.iter().map(|p| p.to_string()).collect(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl PdfTextReader for FixedReader {
        fn page_texts(&self, _path: &Path) -> Result<Vec<String>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages.clone())
        }
    }

    struct FailingReader;

    impl PdfTextReader for FailingReader {
        fn page_texts(&self, path: &Path) -> Result<Vec<String>> {
            Err(Error::file_parse(path.display().to_string(), "corrupt"))
        }
    }

    struct FakeRenderer {
        page_count: usize,
        calls: AtomicUsize,
        seen_dir: std::sync::Mutex<Option<PathBuf>>,
    }

    impl FakeRenderer {
        fn new(page_count: usize) -> Arc<Self> {
            Arc::new(Self {
                page_count,
                calls: AtomicUsize::new(0),
                seen_dir: std::sync::Mutex::new(None),
            })
        }
    }

    impl PageRenderer for FakeRenderer {
        fn render_pages(&self, _pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.seen_dir.lock().unwrap() = Some(out_dir.to_path_buf());
            Ok((1..=self.page_count)
                .map(|n| out_dir.join(format!("page-{:02}.png", n)))
                .collect())
        }
    }

    struct FakeOcr {
        page_text: String,
        calls: AtomicUsize,
    }

    impl FakeOcr {
        fn new(page_text: &str) -> Arc<Self> {
            Arc::new(Self {
                page_text: page_text.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl OcrEngine for FakeOcr {
        fn recognize(&self, _image: &Path, _mode: OcrMode) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.page_text.clone())
        }
    }

    fn input_file() -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"%PDF-1.4 stub").unwrap();
        file
    }

    #[test]
    fn rich_text_layer_skips_ocr() {
        let page = "x".repeat(120);
        let reader = FixedReader::new(&[page.as_str()]);
        let renderer = FakeRenderer::new(1);
        let ocr = FakeOcr::new("should never run");
        let pipeline = PdfTextPipeline::new(reader.clone(), renderer.clone(), ocr.clone(), 100);

        let input = input_file();
        let text = pipeline.extract(input.path()).unwrap();

        assert_eq!(text, page);
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 0);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_text_layer_falls_back_to_ocr() {
        let reader = FixedReader::new(&["", "   "]);
        let renderer = FakeRenderer::new(2);
        let ocr = FakeOcr::new("recognized words");
        let pipeline = PdfTextPipeline::new(reader, renderer.clone(), ocr.clone(), 100);

        let input = input_file();
        let text = pipeline.extract(input.path()).unwrap();

        assert_eq!(text, "recognized words\n\nrecognized words");
        assert_eq!(renderer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 2);

        // The scratch dir the pages were rendered into is gone.
        let render_dir = renderer.seen_dir.lock().unwrap().clone().unwrap();
        assert!(!render_dir.exists());
    }

    #[test]
    fn longer_result_wins() {
        // Direct text below the threshold, OCR strictly longer: OCR wins.
        let reader = FixedReader::new(&["short direct"]);
        let renderer = FakeRenderer::new(1);
        let ocr = FakeOcr::new("a noticeably longer ocr result");
        let pipeline = PdfTextPipeline::new(reader, renderer, ocr, 100);

        let input = input_file();
        let text = pipeline.extract(input.path()).unwrap();
        assert_eq!(text, "a noticeably longer ocr result");
    }

    #[test]
    fn tie_prefers_direct_extraction() {
        let reader = FixedReader::new(&["abcdef"]);
        let renderer = FakeRenderer::new(1);
        let ocr = FakeOcr::new("uvwxyz");
        let pipeline = PdfTextPipeline::new(reader, renderer, ocr, 100);

        let input = input_file();
        let text = pipeline.extract(input.path()).unwrap();
        assert_eq!(text, "abcdef");
    }

    #[test]
    fn corrupt_pdf_degrades_to_ocr_not_error() {
        let renderer = FakeRenderer::new(1);
        let ocr = FakeOcr::new("salvaged by ocr");
        let pipeline =
            PdfTextPipeline::new(Arc::new(FailingReader), renderer, ocr, 100);

        let input = input_file();
        let text = pipeline.extract(input.path()).unwrap();
        assert_eq!(text, "salvaged by ocr");
    }

    #[test]
    fn both_stages_failing_yields_empty_string() {
        struct FailingOcr;
        impl OcrEngine for FailingOcr {
            fn recognize(&self, _image: &Path, _mode: OcrMode) -> Result<String> {
                Err(Error::external_tool("tesseract", "boom"))
            }
        }

        let renderer = FakeRenderer::new(2);
        let pipeline = PdfTextPipeline::new(
            Arc::new(FailingReader),
            renderer,
            Arc::new(FailingOcr),
            100,
        );

        let input = input_file();
        let text = pipeline.extract(input.path()).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn join_pages_separates_with_blank_lines() {
        let pages = vec![
            "page one".to_string(),
            String::new(),
            "page three".to_string(),
        ];
        assert_eq!(join_pages(&pages), "page one\n\npage three");
    }
}
