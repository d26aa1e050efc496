//! Input document types and extension-based classification

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Document category derived from the declared filename's extension.
///
/// Classification is total: every filename maps to exactly one category,
/// with unrecognized or missing extensions resolving to `Unknown`. The
/// decision to reject an unsupported document belongs to the orchestrator,
/// not to the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentCategory {
    /// PDF document
    Pdf,
    /// Word document, modern (.docx) or legacy binary (.doc)
    LegacyDoc,
    /// Raster image (for OCR)
    Image,
    /// Unrecognized extension
    Unknown,
}

impl DocumentCategory {
    /// Classify a filename by its lowercased extension
    pub fn from_filename(filename: &str) -> Self {
        let extension = filename.rsplit('.').next().unwrap_or("").to_lowercase();

        // A name without any dot has no extension; rsplit returns the whole
        // name in that case, which falls through to Unknown anyway.
        match extension.as_str() {
            "pdf" => Self::Pdf,
            "doc" | "docx" => Self::LegacyDoc,
            "jpg" | "jpeg" | "png" | "tiff" | "tif" | "bmp" | "gif" => Self::Image,
            _ => Self::Unknown,
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::LegacyDoc => "Word document",
            Self::Image => "Image",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for DocumentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf => write!(f, "pdf"),
            Self::LegacyDoc => write!(f, "legacy_doc"),
            Self::Image => write!(f, "image"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A document handed to the orchestrator for one request.
///
/// Constructed by the transport layer after spooling the upload to disk;
/// never mutated afterwards.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Path of the spooled upload on disk
    pub path: PathBuf,
    /// Filename as declared by the client (classification uses this,
    /// not the spool path)
    pub filename: String,
    /// Content type as declared by the client, if any
    pub content_type: Option<String>,
}

impl SourceDocument {
    /// Create a new source document
    pub fn new(path: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            path,
            filename: filename.into(),
            content_type: None,
        }
    }

    /// Attach the declared content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Category derived from the declared filename
    pub fn category(&self) -> DocumentCategory {
        DocumentCategory::from_filename(&self.filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_extensions() {
        assert_eq!(DocumentCategory::from_filename("report.pdf"), DocumentCategory::Pdf);
        assert_eq!(DocumentCategory::from_filename("memo.doc"), DocumentCategory::LegacyDoc);
        assert_eq!(DocumentCategory::from_filename("memo.docx"), DocumentCategory::LegacyDoc);
        assert_eq!(DocumentCategory::from_filename("scan.jpeg"), DocumentCategory::Image);
        assert_eq!(DocumentCategory::from_filename("scan.tif"), DocumentCategory::Image);
        assert_eq!(DocumentCategory::from_filename("scan.gif"), DocumentCategory::Image);
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert_eq!(DocumentCategory::from_filename("REPORT.PDF"), DocumentCategory::Pdf);
        assert_eq!(DocumentCategory::from_filename("Scan.TIFF"), DocumentCategory::Image);
    }

    #[test]
    fn unknown_for_everything_else() {
        assert_eq!(DocumentCategory::from_filename("notes.txt"), DocumentCategory::Unknown);
        assert_eq!(DocumentCategory::from_filename("archive.tar.gz"), DocumentCategory::Unknown);
        assert_eq!(DocumentCategory::from_filename("no_extension"), DocumentCategory::Unknown);
        assert_eq!(DocumentCategory::from_filename(""), DocumentCategory::Unknown);
    }

    #[test]
    fn classification_is_deterministic() {
        for name in ["a.pdf", "b.doc", "c.png", "d.xyz", ""] {
            assert_eq!(
                DocumentCategory::from_filename(name),
                DocumentCategory::from_filename(name)
            );
        }
    }
}
