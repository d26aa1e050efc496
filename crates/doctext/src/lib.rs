//! doctext: HTTP text-extraction service for PDFs, Word documents, and images
//!
//! This crate exposes a small HTTP API that accepts uploaded documents and
//! returns their plain text. The interesting part is the extraction fallback
//! chain: direct text-layer reads escalate to OCR when they yield too little
//! content, images are progressively re-OCRed with different engine settings,
//! and legacy binary Word files are converted with LibreOffice before parsing.

pub mod config;
pub mod error;
pub mod extraction;
pub mod server;
pub mod types;

pub use config::DoctextConfig;
pub use error::{Error, Result};
pub use extraction::ExtractionOrchestrator;
pub use types::{
    document::{DocumentCategory, SourceDocument},
    response::{ExtractionResult, ExtractionStatus},
};
