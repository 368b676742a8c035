use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ExtractionError;

/// A file handed over by the upload handler: raw bytes plus the metadata the
/// browser declared for it. Never mutated during extraction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// An uploaded file paired with its extracted hidden-context text, ready to
/// be attached to a conversation turn. `hidden_context` is empty when no text
/// was recoverable; the raw bytes still travel with the turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attachment {
    pub id: Uuid,
    pub file: UploadedFile,
    pub hidden_context: String,
}

impl Attachment {
    pub fn new(file: UploadedFile, hidden_context: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            file,
            hidden_context,
        }
    }
}

/// OCR engine abstraction. Engines are configured with a single default
/// recognition language; one failed attempt yields an error, never a retry.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Recognize text in a raster image (PNG/JPEG/TIFF bytes).
    async fn recognize(&self, image_bytes: &[u8]) -> Result<String, ExtractionError>;
}

/// PDF text-layer abstraction: per-page embedded text, in page order.
pub trait PdfTextSource: Send + Sync {
    /// Extract the embedded text of every page, index 0 = page 1.
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError>;

    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError> {
        Ok(self.page_texts(pdf_bytes)?.len())
    }
}

/// Rasterizes a single PDF page so it can be OCR'd.
pub trait PdfPageRenderer: Send + Sync {
    /// Render page `page_index` (0-based) to an encoded raster image.
    /// `scale` is a multiplier over native page resolution; implementations
    /// that recover the original scan bitmap may ignore it.
    fn render_page(
        &self,
        pdf_bytes: &[u8],
        page_index: usize,
        scale: f32,
    ) -> Result<Vec<u8>, ExtractionError>;
}

/// WordprocessingML to plain text conversion, one call per document.
pub trait DocxConverter: Send + Sync {
    fn convert_to_text(&self, docx_bytes: &[u8]) -> Result<String, ExtractionError>;
}
