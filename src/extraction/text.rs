//! Plain-text attachments: decode the bytes, nothing else.

use super::ExtractionError;

/// Decode file bytes as UTF-8 and return them untransformed. The downstream
/// contract requires byte-faithful text for text-like formats, so no
/// trimming or normalization happens here.
pub fn read_plain_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| ExtractionError::Encoding(e.to_string()))
}
