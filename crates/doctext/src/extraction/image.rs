//! Image OCR with progressive retry under increasing effort

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::error::{Error, Result};

use super::ocr::{OcrEngine, OcrMode};

/// Image OCR pipeline.
///
/// The image is first enhanced (grayscale, contrast boost, light blur,
/// binarization) to maximize text/background separation. If the default OCR
/// pass yields fewer than `retry_threshold` trimmed characters, the same
/// enhanced image is retried with the sparse-block engine mode, and failing
/// that, the original unenhanced image gets one last pass. Each attempt is
/// strictly a fallback for the previous one; results are never compared.
pub struct ImageOcrPipeline {
    ocr: Arc<dyn OcrEngine>,
    retry_threshold: usize,
    contrast_boost: f32,
    blur_sigma: f32,
    binarize_threshold: u8,
}

impl ImageOcrPipeline {
    pub fn new(
        ocr: Arc<dyn OcrEngine>,
        retry_threshold: usize,
        contrast_boost: f32,
        blur_sigma: f32,
        binarize_threshold: u8,
    ) -> Self {
        Self {
            ocr,
            retry_threshold,
            contrast_boost,
            blur_sigma,
            binarize_threshold,
        }
    }

    /// Extract text from a raster image. Every OCR attempt's failure
    /// degrades to an empty result so the next fallback can run; total
    /// failure yields an empty string.
    pub fn extract(&self, path: &Path) -> Result<String> {
        if !path.is_file() {
            return Err(Error::internal(format!(
                "input file does not exist: {}",
                path.display()
            )));
        }

        let workdir = TempDir::new()?;

        // Enhancement failure is not fatal: fall back to OCRing the
        // original image for the first attempt as well.
        let enhanced = match enhance_image(
            path,
            workdir.path(),
            self.contrast_boost,
            self.blur_sigma,
            self.binarize_threshold,
        ) {
            Ok(enhanced) => Some(enhanced),
            Err(e) => {
                tracing::warn!("Image enhancement failed: {}", e);
                None
            }
        };
        let first_target = enhanced.as_deref().unwrap_or(path);

        let mut text = self.attempt(first_target, OcrMode::Document);

        if text.trim().chars().count() < self.retry_threshold {
            tracing::info!("Limited text found, retrying with sparse block segmentation");
            text = self.attempt(first_target, OcrMode::SparseBlock);

            if text.trim().chars().count() < self.retry_threshold {
                tracing::info!("Still limited text, retrying on the original image");
                text = self.attempt(path, OcrMode::Document);
            }
        }

        Ok(text.trim().to_string())
    }

    fn attempt(&self, image: &Path, mode: OcrMode) -> String {
        match self.ocr.recognize(image, mode) {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("OCR attempt failed: {}", e);
                String::new()
            }
        }
    }
}

/// Produce an enhanced variant of `src` in `out_dir`: single-channel
/// grayscale, boosted contrast, a small-radius blur to suppress noise, then
/// a fixed-threshold binarization (above the threshold becomes white,
/// everything else black).
pub fn enhance_image(
    src: &Path,
    out_dir: &Path,
    contrast_boost: f32,
    blur_sigma: f32,
    binarize_threshold: u8,
) -> Result<PathBuf> {
    let img = image::open(src)
        .map_err(|e| Error::file_parse(src.display().to_string(), e.to_string()))?;

    let mut gray = img
        .grayscale()
        .adjust_contrast(contrast_boost)
        .blur(blur_sigma)
        .to_luma8();

    for pixel in gray.pixels_mut() {
        pixel.0[0] = if pixel.0[0] > binarize_threshold { 255 } else { 0 };
    }

    let out_path = out_dir.join("enhanced.png");
    gray.save(&out_path)
        .map_err(|e| Error::internal(format!("failed to write enhanced image: {}", e)))?;

    Ok(out_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Returns scripted texts attempt by attempt, recording each call.
    struct ScriptedOcr {
        responses: Mutex<Vec<Result<String>>>,
        calls: AtomicUsize,
        modes: Mutex<Vec<OcrMode>>,
        images: Mutex<Vec<PathBuf>>,
    }

    impl ScriptedOcr {
        fn new(responses: Vec<Result<String>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
                modes: Mutex::new(Vec::new()),
                images: Mutex::new(Vec::new()),
            })
        }
    }

    impl OcrEngine for ScriptedOcr {
        fn recognize(&self, image: &Path, mode: OcrMode) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.modes.lock().unwrap().push(mode);
            self.images.lock().unwrap().push(image.to_path_buf());
            let mut responses = self.responses.lock().unwrap();
            if responses.is_empty() {
                Ok(String::new())
            } else {
                responses.remove(0)
            }
        }
    }

    fn test_image() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.png");
        let mut img = image::GrayImage::new(8, 8);
        for (x, _y, pixel) in img.enumerate_pixels_mut() {
            pixel.0[0] = if x % 2 == 0 { 200 } else { 40 };
        }
        img.save(&path).unwrap();
        (dir, path)
    }

    fn pipeline(ocr: Arc<dyn OcrEngine>) -> ImageOcrPipeline {
        ImageOcrPipeline::new(ocr, 50, 100.0, 0.5, 150)
    }

    #[test]
    fn good_first_pass_stops_escalation() {
        let long_text = "w".repeat(60);
        let ocr = ScriptedOcr::new(vec![Ok(long_text.clone())]);
        let (_dir, path) = test_image();

        let text = pipeline(ocr.clone()).extract(&path).unwrap();

        assert_eq!(text, long_text);
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn short_results_escalate_through_all_three_attempts() {
        let ocr = ScriptedOcr::new(vec![
            Ok("tiny".to_string()),
            Ok("still tiny".to_string()),
            Ok("final short answer".to_string()),
        ]);
        let (_dir, path) = test_image();

        let text = pipeline(ocr.clone()).extract(&path).unwrap();

        // The last attempt's text is returned even though it is still below
        // the threshold; escalation is a fallback chain, not a contest.
        assert_eq!(text, "final short answer");
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            *ocr.modes.lock().unwrap(),
            vec![OcrMode::Document, OcrMode::SparseBlock, OcrMode::Document]
        );

        let images = ocr.images.lock().unwrap();
        // First two attempts saw the enhanced variant, the last the original,
        // and the enhanced artifact did not outlive the call.
        assert_eq!(images[0], images[1]);
        assert_eq!(images[2], path);
        assert_ne!(images[0], images[2]);
        assert!(!images[0].exists());
    }

    #[test]
    fn total_engine_failure_yields_empty_string() {
        let ocr = ScriptedOcr::new(vec![
            Err(Error::external_tool("tesseract", "boom")),
            Err(Error::external_tool("tesseract", "boom")),
            Err(Error::external_tool("tesseract", "boom")),
        ]);
        let (_dir, path) = test_image();

        let text = pipeline(ocr.clone()).extract(&path).unwrap();

        assert!(text.is_empty());
        assert_eq!(ocr.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn enhancement_produces_binarized_image() {
        let (_dir, path) = test_image();
        let out_dir = tempfile::tempdir().unwrap();

        let enhanced = enhance_image(&path, out_dir.path(), 100.0, 0.5, 150).unwrap();
        assert!(enhanced.is_file());

        let img = image::open(&enhanced).unwrap().to_luma8();
        assert!(img.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
    }

    #[test]
    fn missing_input_is_an_error() {
        let ocr = ScriptedOcr::new(vec![]);
        let result = pipeline(ocr).extract(Path::new("/nonexistent/image.png"));
        assert!(result.is_err());
    }
}
