//! Anamnesis ingestion core.
//!
//! Turns files uploaded during a clinical intake session (PDF, Office
//! documents, images, plain text, legacy binary formats) into best-effort
//! plain text that the conversation layer attaches as hidden context for the
//! AI model. The surrounding application (vitals forms, chat, report
//! rendering, the record store) lives elsewhere and talks to this crate
//! through [`extraction::AttachmentExtractor`].
//!
//! Extraction never fails loudly: a file that cannot be parsed yields an
//! empty string, logged for diagnostics, and the intake flow continues with
//! the raw bytes alone.

pub mod extraction;

pub use extraction::{
    classify, Attachment, AttachmentExtractor, ExtractionError, FileKind, UploadedFile,
};
