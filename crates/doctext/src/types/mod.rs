//! Core types for the extraction service

pub mod document;
pub mod response;

pub use document::{DocumentCategory, SourceDocument};
pub use response::{
    Base64ExtractRequest, BatchExtractResponse, BatchFileResult, ExtractResponse,
    ExtractionResult, ExtractionStatus,
};
