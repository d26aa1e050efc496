//! PDF page-to-image rendering boundary (poppler)

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Boundary to the page renderer: a PDF in, one raster image per page out.
pub trait PageRenderer: Send + Sync {
    /// Render every page of `pdf` into `out_dir`, returning the image paths
    /// in page order.
    fn render_pages(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>>;
}

/// Page rendering via pdftoppm (poppler-utils)
pub struct PopplerRenderer {
    dpi: u32,
}

impl PopplerRenderer {
    pub fn new(dpi: u32) -> Self {
        Self { dpi }
    }

    /// Check if pdftoppm is available
    pub fn is_available() -> bool {
        Command::new("pdftoppm")
            .arg("-v")
            .output()
            .map(|_| true) // pdftoppm -v writes to stderr, just check the command exists
            .unwrap_or(false)
    }
}

impl PageRenderer for PopplerRenderer {
    fn render_pages(&self, pdf: &Path, out_dir: &Path) -> Result<Vec<PathBuf>> {
        let prefix = out_dir.join("page");

        let output = Command::new("pdftoppm")
            .arg("-png")
            .args(["-r", &self.dpi.to_string()])
            .arg(pdf)
            .arg(&prefix)
            .output()
            .map_err(|e| Error::external_tool("pdftoppm", format!("failed to spawn: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::external_tool(
                "pdftoppm",
                format!("exit status {}: {}", output.status, stderr.trim()),
            ));
        }

        // pdftoppm zero-pads page numbers, so a lexicographic sort keeps
        // page order.
        let mut pages: Vec<PathBuf> = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "png"))
            .collect();
        pages.sort();

        if pages.is_empty() {
            return Err(Error::external_tool("pdftoppm", "produced no page images"));
        }

        Ok(pages)
    }
}
