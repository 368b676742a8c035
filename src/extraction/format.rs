//! Attachment format classification.
//!
//! Pure function over the declared media type and the file name extension.
//! Browsers routinely upload files with an empty or generic media type, so
//! when the declared type carries no information we substitute a guess from
//! the extension before applying the rules.

use std::collections::HashSet;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Extraction strategy chosen for an uploaded file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileKind {
    PlainText,
    Image,
    Pdf,
    Docx,
    Pptx,
    Xlsx,
    LegacyBinary,
    Unsupported,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlainText => "plain_text",
            Self::Image => "image",
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Pptx => "pptx",
            Self::Xlsx => "xlsx",
            Self::LegacyBinary => "legacy_binary",
            Self::Unsupported => "unsupported",
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unsupported)
    }
}

/// Extensions read directly as text. Frozen at first use, no mutation API.
static TEXT_EXTENSIONS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    ["txt", "csv", "md", "json", "xml", "html", "htm", "log", "rtf"]
        .into_iter()
        .collect()
});

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_PPTX: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const MIME_XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Classify an uploaded file. Rules are checked in priority order; the first
/// match wins. No side effects.
pub fn classify(media_type: &str, file_name: &str) -> FileKind {
    let ext = extension(file_name);
    let media_type = effective_media_type(media_type, file_name);
    let media_type = media_type.as_str();

    if TEXT_EXTENSIONS.contains(ext.as_str()) || media_type.starts_with("text/") {
        return FileKind::PlainText;
    }
    if media_type.starts_with("image/") {
        return FileKind::Image;
    }
    if ext == "pdf" || media_type == MIME_PDF {
        return FileKind::Pdf;
    }
    if ext == "docx" || media_type == MIME_DOCX {
        return FileKind::Docx;
    }
    if ext == "pptx" || media_type == MIME_PPTX {
        return FileKind::Pptx;
    }
    if ext == "xlsx" || media_type == MIME_XLSX {
        return FileKind::Xlsx;
    }
    if matches!(ext.as_str(), "doc" | "ppt" | "xls") {
        return FileKind::LegacyBinary;
    }
    FileKind::Unsupported
}

fn extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
        _ => String::new(),
    }
}

/// Declared media type, or a `mime_guess` from the file name when the
/// declaration carries no information.
fn effective_media_type(declared: &str, file_name: &str) -> String {
    let declared = declared.trim();
    if !declared.is_empty() && declared != "application/octet-stream" {
        return declared.to_ascii_lowercase();
    }
    mime_guess::from_path(file_name)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| declared.to_ascii_lowercase())
}
