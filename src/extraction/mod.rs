//! Multi-format text extraction for intake attachments.
//!
//! Every uploaded file passes through [`AttachmentExtractor`], which
//! classifies it by declared media type and file name, routes it to one
//! extractor, and collapses any failure to an empty string. Extractors
//! return `Result<String, ExtractionError>` internally; the orchestrator is
//! the only place errors are swallowed.

pub mod docx;
pub mod format;
pub mod image;
pub mod legacy;
pub mod ocr;
mod ooxml;
pub mod orchestrator;
pub mod pdf;
pub mod pdf_renderer;
pub mod pptx;
pub mod sanitize;
pub mod text;
pub mod types;
pub mod xlsx;

pub use format::{classify, FileKind};
pub use ocr::MockOcrEngine;
#[cfg(feature = "ocr")]
pub use ocr::TesseractOcr;
pub use orchestrator::AttachmentExtractor;
pub use types::{Attachment, DocxConverter, OcrEngine, PdfPageRenderer, PdfTextSource, UploadedFile};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("text decoding failed: {0}")]
    Encoding(String),

    #[error("OCR processing failed: {0}")]
    Ocr(String),

    #[error("PDF parsing failed: {0}")]
    PdfParsing(String),

    #[error("PDF page rendering failed: {0}")]
    PdfRender(String),

    #[error("document container unreadable: {0}")]
    Container(String),

    #[error("malformed XML part: {0}")]
    Xml(String),

    #[error("image processing error: {0}")]
    ImageProcessing(String),
}
