//! Cleanup for OCR output before it becomes hidden context.
//!
//! OCR engines emit stray control characters and ragged blank lines. Plain
//! text attachments must stay byte-faithful, so this runs only on recognized
//! text, never on decoded text files.

/// Strip control characters (newlines and tabs excepted), trim each line and
/// drop the empty ones.
pub fn sanitize_ocr_text(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect::<String>()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
