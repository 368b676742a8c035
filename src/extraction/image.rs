//! Raster image attachments: a single OCR pass.

use super::sanitize::sanitize_ocr_text;
use super::types::OcrEngine;
use super::ExtractionError;

/// Run one recognition attempt over the raw image bytes and return the
/// sanitized, trimmed text. A failed attempt is an error for the caller to
/// swallow; there are no retries.
pub async fn extract_image_text(
    ocr: &dyn OcrEngine,
    image_bytes: &[u8],
) -> Result<String, ExtractionError> {
    let recognized = ocr.recognize(image_bytes).await?;
    Ok(sanitize_ocr_text(&recognized).trim().to_string())
}
