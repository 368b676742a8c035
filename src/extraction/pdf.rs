//! PDF attachments: embedded text layer first, OCR fallback for scans.
//!
//! Phase A walks the text layer page by page. When the whole document yields
//! nothing, Phase B rasterizes the first pages and pipes them through the
//! OCR engine. The skip is whole-document by policy: if any page had a text
//! layer, no OCR runs, and a mixed text/scan document keeps only its text
//! pages.

use super::sanitize::sanitize_ocr_text;
use super::types::{OcrEngine, PdfPageRenderer, PdfTextSource};
use super::ExtractionError;

/// Hard cap on OCR'd pages for scanned documents; bounds the cost of a long
/// scan at intake time.
pub const OCR_PAGE_CAP: usize = 10;

/// Pages are rasterized above native resolution to improve recognition.
pub const OCR_RENDER_SCALE: f32 = 2.0;

/// Text-layer source backed by the `pdf-extract` crate.
pub struct PdfTextLayer;

impl PdfTextSource for PdfTextLayer {
    fn page_texts(&self, pdf_bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
        pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| ExtractionError::PdfParsing(e.to_string()))
    }
}

/// Two-phase extraction over one PDF. Any error in either phase fails the
/// whole file; phase output is only committed once the phase completes.
pub async fn extract_pdf_text(
    source: &dyn PdfTextSource,
    renderer: Option<&dyn PdfPageRenderer>,
    ocr: &dyn OcrEngine,
    pdf_bytes: &[u8],
) -> Result<String, ExtractionError> {
    let pages = source.page_texts(pdf_bytes)?;

    let embedded = collect_text_layer(&pages);
    if !embedded.trim().is_empty() {
        tracing::debug!(pages = pages.len(), "PDF text layer found, OCR skipped");
        return Ok(embedded);
    }

    let Some(renderer) = renderer else {
        tracing::warn!("scanned PDF but no page renderer configured, returning no text");
        return Ok(String::new());
    };

    ocr_scanned_pages(renderer, ocr, pdf_bytes, pages.len()).await
}

/// Phase A: join each page's text items with single spaces, label non-empty
/// pages, keep source page order.
fn collect_text_layer(pages: &[String]) -> String {
    let mut buf = String::new();
    for (idx, page) in pages.iter().enumerate() {
        let joined = page.split_whitespace().collect::<Vec<_>>().join(" ");
        if !joined.is_empty() {
            buf.push_str(&format!("[Page {}] {}\n", idx + 1, joined));
        }
    }
    buf.trim_end().to_string()
}

/// Phase B: rasterize and OCR the first `min(N, OCR_PAGE_CAP)` pages, in
/// order, one at a time.
async fn ocr_scanned_pages(
    renderer: &dyn PdfPageRenderer,
    ocr: &dyn OcrEngine,
    pdf_bytes: &[u8],
    page_count: usize,
) -> Result<String, ExtractionError> {
    let limit = page_count.min(OCR_PAGE_CAP);
    if page_count > OCR_PAGE_CAP {
        tracing::info!(
            pages = page_count,
            cap = OCR_PAGE_CAP,
            "long scanned PDF, OCR limited to first pages"
        );
    }

    let mut sections = Vec::new();
    for idx in 0..limit {
        let raster = renderer.render_page(pdf_bytes, idx, OCR_RENDER_SCALE)?;
        let recognized = ocr.recognize(&raster).await?;
        let cleaned = sanitize_ocr_text(&recognized);
        let cleaned = cleaned.trim();
        if !cleaned.is_empty() {
            sections.push(format!("[Page {}] {}", idx + 1, cleaned));
        }
    }
    Ok(sections.join("\n\n"))
}
