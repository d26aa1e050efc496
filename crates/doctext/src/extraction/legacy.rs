//! Word document extraction: structured .docx parsing with LibreOffice
//! conversion for legacy .doc files

use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::{Error, Result};

/// Boundary to the external format converter: a legacy file in, a modern
/// `.docx` in the output directory out.
pub trait DocumentConverter: Send + Sync {
    fn convert_to_docx(&self, input: &Path, out_dir: &Path) -> Result<PathBuf>;
}

/// Legacy format conversion via headless LibreOffice.
///
/// The conversion is bounded by a deadline; an unresponsive process is
/// killed and reported as a timeout, never retried.
pub struct LibreOfficeConverter {
    command: String,
    timeout: Duration,
}

impl LibreOfficeConverter {
    pub fn new(timeout: Duration) -> Self {
        Self {
            command: "libreoffice".to_string(),
            timeout,
        }
    }

    /// Use an alternate executable (e.g. `soffice` on some installs)
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Check if LibreOffice is available
    pub fn is_available() -> bool {
        Command::new("libreoffice")
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl DocumentConverter for LibreOfficeConverter {
    fn convert_to_docx(&self, input: &Path, out_dir: &Path) -> Result<PathBuf> {
        let mut child = Command::new(&self.command)
            .arg("--headless")
            .args(["--convert-to", "docx"])
            .arg("--outdir")
            .arg(out_dir)
            .arg(input)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                Error::external_tool(self.command.as_str(), format!("failed to spawn: {}", e))
            })?;

        let status = wait_with_deadline(&mut child, self.timeout)?;
        if !status.success() {
            return Err(Error::external_tool(
                self.command.as_str(),
                format!("conversion exited with {}", status),
            ));
        }

        // LibreOffice names the output after the input stem; scanning the
        // directory also covers stems it normalizes.
        let converted = std::fs::read_dir(out_dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| path.extension().is_some_and(|ext| ext == "docx"));

        converted.ok_or_else(|| {
            Error::external_tool(self.command.as_str(), "converted .docx not found in output directory")
        })
    }
}

/// Wait for a child process, killing it when the deadline passes.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<ExitStatus> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if start.elapsed() >= timeout {
            child.kill().ok();
            child.wait().ok();
            return Err(Error::ConversionTimeout {
                seconds: timeout.as_secs(),
            });
        }
        std::thread::sleep(Duration::from_millis(100));
    }
}

/// Word document extraction pipeline, dispatching on the declared extension.
pub struct LegacyDocPipeline {
    converter: Arc<dyn DocumentConverter>,
}

impl LegacyDocPipeline {
    pub fn new(converter: Arc<dyn DocumentConverter>) -> Self {
        Self { converter }
    }

    /// Extract text from a `.doc` or `.docx` file. All stages degrade to an
    /// empty string on error; the pipeline only errors on infrastructure
    /// problems (missing input, no temp space).
    pub fn extract(&self, path: &Path, filename: &str) -> Result<String> {
        if !path.is_file() {
            return Err(Error::internal(format!(
                "input file does not exist: {}",
                path.display()
            )));
        }

        let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();
        let text = match extension.as_str() {
            "docx" => match read_docx_text(path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Failed to parse .docx '{}': {}", filename, e);
                    String::new()
                }
            },
            "doc" => match self.extract_legacy(path) {
                Ok(text) => text,
                Err(e) => {
                    tracing::warn!("Legacy .doc conversion failed for '{}': {}", filename, e);
                    String::new()
                }
            },
            other => {
                tracing::warn!("Unsupported word-processor format: {}", other);
                String::new()
            }
        };

        Ok(text)
    }

    /// Convert a legacy `.doc` in an isolated temp dir and recurse into the
    /// `.docx` path. The directory and its contents are removed whatever
    /// happens.
    fn extract_legacy(&self, path: &Path) -> Result<String> {
        let workdir = tempfile::Builder::new().prefix("doctext-convert-").tempdir()?;
        let converted = self.converter.convert_to_docx(path, workdir.path())?;
        read_docx_text(&converted)
    }
}

/// Read a `.docx` file: all paragraph texts in document order, then all
/// table cell texts row-major and cell-major within each row, one entry per
/// line. Empty paragraphs and cells contribute empty lines; that is layout
/// fidelity, not noise to filter.
pub fn read_docx_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    let docx = docx_rs::read_docx(&bytes)
        .map_err(|e| Error::file_parse(path.display().to_string(), e.to_string()))?;

    let mut lines: Vec<String> = Vec::new();

    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Paragraph(paragraph) = child {
            lines.push(paragraph_text(paragraph));
        }
    }

    for child in &docx.document.children {
        if let docx_rs::DocumentChild::Table(table) = child {
            for row in &table.rows {
                let docx_rs::TableChild::TableRow(row) = row;
                for cell in &row.cells {
                    let docx_rs::TableRowChild::TableCell(cell) = cell;
                    lines.push(cell_text(cell));
                }
            }
        }
    }

    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &paragraph.children {
        if let docx_rs::ParagraphChild::Run(run) = child {
            for child in &run.children {
                if let docx_rs::RunChild::Text(t) = child {
                    text.push_str(&t.text);
                }
            }
        }
    }
    text
}

fn cell_text(cell: &docx_rs::TableCell) -> String {
    let mut paragraphs = Vec::new();
    for content in &cell.children {
        if let docx_rs::TableCellContent::Paragraph(paragraph) = content {
            paragraphs.push(paragraph_text(paragraph));
        }
    }
    paragraphs.join("\n")
}
