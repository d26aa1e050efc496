//! Request and response types for the extraction API

use serde::{Deserialize, Serialize};

use super::document::DocumentCategory;

/// Outcome of an extraction request.
///
/// "No text found" and "an error occurred" are deliberately distinct values;
/// callers must be able to tell an empty scan from a broken request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Extraction produced usable text
    Success,
    /// Every strategy ran but no text was found
    NoText,
    /// The file type is not supported; no pipeline was invoked
    Unsupported,
    /// A pipeline failed in a way it could not absorb
    Failed,
}

impl std::fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::NoText => write!(f, "no_text"),
            Self::Unsupported => write!(f, "unsupported"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// The value the orchestrator returns to the transport layer.
/// Constructed once per request; immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Final extracted text (empty unless status is `Success`)
    pub text: String,
    /// Category the document was classified into
    pub category: DocumentCategory,
    /// Outcome status
    pub status: ExtractionStatus,
}

impl ExtractionResult {
    /// Build a result from extracted text, deriving the status from content
    pub fn from_text(category: DocumentCategory, text: String) -> Self {
        if text.trim().is_empty() {
            Self {
                text: String::new(),
                category,
                status: ExtractionStatus::NoText,
            }
        } else {
            Self {
                text,
                category,
                status: ExtractionStatus::Success,
            }
        }
    }

    /// Result for an unsupported file type
    pub fn unsupported(category: DocumentCategory) -> Self {
        Self {
            text: String::new(),
            category,
            status: ExtractionStatus::Unsupported,
        }
    }

    /// Result for a pipeline failure the orchestrator absorbed
    pub fn failed(category: DocumentCategory) -> Self {
        Self {
            text: String::new(),
            category,
            status: ExtractionStatus::Failed,
        }
    }
}

/// Response body for single-file extraction endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractResponse {
    /// Filename as declared by the client
    pub filename: String,
    /// Extracted text
    pub text: String,
    /// Detected file category
    pub file_type: DocumentCategory,
    /// Outcome status
    pub status: ExtractionStatus,
}

impl ExtractResponse {
    /// Build the wire response from an extraction result
    pub fn new(filename: String, result: ExtractionResult) -> Self {
        Self {
            filename,
            text: result.text,
            file_type: result.category,
            status: result.status,
        }
    }
}

/// Request body for `POST /extract-text-base64`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Base64ExtractRequest {
    /// Declared filename (used for classification)
    pub filename: String,
    /// Declared content type
    #[serde(default)]
    pub content_type: Option<String>,
    /// Base64-encoded file content
    pub base64_data: String,
}

/// Response body for `POST /batch-extract`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchExtractResponse {
    /// Per-file outcomes, in upload order
    pub results: Vec<BatchFileResult>,
}

/// One file's outcome within a batch request.
/// A single file's failure never aborts the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchFileResult {
    /// Filename as declared by the client
    pub filename: String,
    /// Outcome status
    pub status: ExtractionStatus,
    /// Extracted text (present unless the file errored before extraction)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Detected file category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<DocumentCategory>,
    /// Error message when the upload itself could not be handled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchFileResult {
    /// Successful (or absorbed) extraction outcome
    pub fn from_result(filename: String, result: ExtractionResult) -> Self {
        Self {
            filename,
            status: result.status,
            text: Some(result.text),
            file_type: Some(result.category),
            error: None,
        }
    }

    /// Upload-level failure for one batch entry
    pub fn from_error(filename: String, message: String) -> Self {
        Self {
            filename,
            status: ExtractionStatus::Failed,
            text: None,
            file_type: None,
            error: Some(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_values_are_distinguishable_on_the_wire() {
        let no_text = serde_json::to_string(&ExtractionStatus::NoText).unwrap();
        let failed = serde_json::to_string(&ExtractionStatus::Failed).unwrap();
        let unsupported = serde_json::to_string(&ExtractionStatus::Unsupported).unwrap();
        assert_eq!(no_text, "\"no_text\"");
        assert_eq!(failed, "\"failed\"");
        assert_eq!(unsupported, "\"unsupported\"");
    }

    #[test]
    fn from_text_distinguishes_empty_from_success() {
        let empty = ExtractionResult::from_text(DocumentCategory::Pdf, "   \n".to_string());
        assert_eq!(empty.status, ExtractionStatus::NoText);
        assert!(empty.text.is_empty());

        let ok = ExtractionResult::from_text(DocumentCategory::Pdf, "hello".to_string());
        assert_eq!(ok.status, ExtractionStatus::Success);
        assert_eq!(ok.text, "hello");
    }

    #[test]
    fn batch_error_omits_text_fields() {
        let item = BatchFileResult::from_error("x.pdf".into(), "boom".into());
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("text").is_none());
        assert!(json.get("file_type").is_none());
        assert_eq!(json["status"], "failed");
    }
}
