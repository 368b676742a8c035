//! Intake orchestration: classify each uploaded file, dispatch to the right
//! extractor, and never let one bad attachment fail the batch.

use super::docx::ContainerDocxConverter;
use super::format::{classify, FileKind};
use super::image::extract_image_text;
use super::legacy::extract_legacy_text;
use super::pdf::{extract_pdf_text, PdfTextLayer};
use super::pdf_renderer::ScanImageRenderer;
use super::pptx::extract_pptx_text;
use super::text::read_plain_text;
use super::types::{Attachment, DocxConverter, OcrEngine, PdfPageRenderer, PdfTextSource, UploadedFile};
use super::xlsx::extract_xlsx_text;
use super::ExtractionError;

/// Extraction front door. Collaborators are trait objects so OCR and PDF
/// handling can be swapped out in tests or replaced with other backends.
pub struct AttachmentExtractor {
    ocr: Box<dyn OcrEngine>,
    pdf_source: Box<dyn PdfTextSource>,
    pdf_renderer: Option<Box<dyn PdfPageRenderer>>,
    docx: Box<dyn DocxConverter>,
}

impl AttachmentExtractor {
    /// Build an extractor around the given OCR engine with default PDF and
    /// DOCX backends.
    pub fn new(ocr: Box<dyn OcrEngine>) -> Self {
        Self {
            ocr,
            pdf_source: Box::new(PdfTextLayer),
            pdf_renderer: Some(Box::new(ScanImageRenderer)),
            docx: Box::new(ContainerDocxConverter),
        }
    }

    pub fn with_pdf_source(mut self, source: Box<dyn PdfTextSource>) -> Self {
        self.pdf_source = source;
        self
    }

    pub fn with_pdf_renderer(mut self, renderer: Option<Box<dyn PdfPageRenderer>>) -> Self {
        self.pdf_renderer = renderer;
        self
    }

    pub fn with_docx_converter(mut self, converter: Box<dyn DocxConverter>) -> Self {
        self.docx = converter;
        self
    }

    /// Extract text from one uploaded file. Never fails: classification
    /// misses and extraction errors both collapse to an empty string, with
    /// the error logged for operators.
    pub async fn extract(&self, file: &UploadedFile) -> String {
        match self.try_extract(file).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(file = %file.name, error = %e, "attachment extraction failed");
                String::new()
            }
        }
    }

    async fn try_extract(&self, file: &UploadedFile) -> Result<String, ExtractionError> {
        let kind = classify(&file.media_type, &file.name);
        tracing::debug!(file = %file.name, kind = kind.as_str(), "dispatching attachment");

        match kind {
            FileKind::PlainText => read_plain_text(&file.bytes),
            FileKind::Image => extract_image_text(self.ocr.as_ref(), &file.bytes).await,
            FileKind::Pdf => {
                extract_pdf_text(
                    self.pdf_source.as_ref(),
                    self.pdf_renderer.as_deref(),
                    self.ocr.as_ref(),
                    &file.bytes,
                )
                .await
            }
            FileKind::Docx => self.docx.convert_to_text(&file.bytes),
            FileKind::Pptx => extract_pptx_text(&file.bytes),
            FileKind::Xlsx => extract_xlsx_text(&file.bytes),
            FileKind::LegacyBinary => Ok(extract_legacy_text(&file.bytes)),
            FileKind::Unsupported => {
                tracing::debug!(file = %file.name, media_type = %file.media_type, "unsupported attachment type");
                Ok(String::new())
            }
        }
    }

    /// Extract every file in order, one at a time. Output index `i` always
    /// corresponds to input index `i`.
    pub async fn extract_all(&self, files: &[UploadedFile]) -> Vec<String> {
        let total = files.len();
        let mut texts = Vec::with_capacity(total);
        for (i, file) in files.iter().enumerate() {
            tracing::info!(file = %file.name, position = i + 1, total, "extracting attachment");
            texts.push(self.extract(file).await);
        }
        texts
    }

    /// Extract all files and pair each with its text as an [`Attachment`].
    pub async fn prepare_attachments(&self, files: Vec<UploadedFile>) -> Vec<Attachment> {
        let texts = self.extract_all(&files).await;
        files
            .into_iter()
            .zip(texts)
            .map(|(file, text)| Attachment::new(file, text))
            .collect()
    }
}
