//! OCR engine implementations.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use super::types::OcrEngine;
use super::ExtractionError;

/// Bundled Tesseract engine, configured for one recognition language.
/// Only available when compiled with the `ocr` feature flag.
#[cfg(feature = "ocr")]
pub struct TesseractOcr {
    tessdata_dir: std::path::PathBuf,
    language: String,
}

#[cfg(feature = "ocr")]
impl TesseractOcr {
    /// Initialize against a tessdata directory. `language` is the single
    /// default recognition language, e.g. `"eng"`.
    pub fn new(tessdata_dir: &std::path::Path, language: &str) -> Result<Self, ExtractionError> {
        let traineddata = tessdata_dir.join(format!("{language}.traineddata"));
        if !traineddata.exists() {
            return Err(ExtractionError::Ocr(format!(
                "traineddata for '{}' not found under {}",
                language,
                tessdata_dir.display()
            )));
        }
        Ok(Self {
            tessdata_dir: tessdata_dir.to_path_buf(),
            language: language.to_string(),
        })
    }
}

#[cfg(feature = "ocr")]
#[async_trait]
impl OcrEngine for TesseractOcr {
    async fn recognize(&self, image_bytes: &[u8]) -> Result<String, ExtractionError> {
        let tessdata = self
            .tessdata_dir
            .to_str()
            .ok_or_else(|| ExtractionError::Ocr("invalid tessdata path".into()))?
            .to_string();
        let language = self.language.clone();
        let image = image_bytes.to_vec();

        // Recognition is CPU-bound; keep it off the cooperative scheduler.
        let text = tokio::task::spawn_blocking(move || {
            let tess = tesseract::Tesseract::new(Some(&tessdata), Some(&language))
                .map_err(|e| ExtractionError::Ocr(format!("{e:?}")))?;
            let mut tess = tess
                .set_image_from_mem(&image)
                .map_err(|e| ExtractionError::Ocr(format!("{e:?}")))?;
            tess.get_text()
                .map_err(|e| ExtractionError::Ocr(format!("{e:?}")))
        })
        .await
        .map_err(|e| ExtractionError::Ocr(format!("OCR task failed: {e}")))??;

        Ok(text)
    }
}

/// Deterministic OCR engine for tests: returns a fixed text and counts calls
/// so tests can assert whether the OCR fallback ran at all.
#[derive(Clone)]
pub struct MockOcrEngine {
    text: Arc<str>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockOcrEngine {
    pub fn new(text: &str) -> Self {
        Self {
            text: Arc::from(text),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: false,
        }
    }

    /// Engine whose every recognition attempt fails.
    pub fn failing() -> Self {
        Self {
            text: Arc::from(""),
            calls: Arc::new(AtomicUsize::new(0)),
            fail: true,
        }
    }

    /// Number of recognition attempts made through any clone of this engine.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OcrEngine for MockOcrEngine {
    async fn recognize(&self, _image_bytes: &[u8]) -> Result<String, ExtractionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ExtractionError::Ocr("mock engine configured to fail".into()));
        }
        Ok(self.text.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_returns_configured_text() {
        let engine = MockOcrEngine::new("Metformin 500mg");
        let text = engine.recognize(b"fake image").await.unwrap();
        assert_eq!(text, "Metformin 500mg");
    }

    #[tokio::test]
    async fn mock_counts_calls_across_clones() {
        let engine = MockOcrEngine::new("x");
        let clone = engine.clone();
        clone.recognize(b"a").await.unwrap();
        clone.recognize(b"b").await.unwrap();
        assert_eq!(engine.call_count(), 2);
    }

    #[tokio::test]
    async fn failing_mock_errors_once_per_attempt() {
        let engine = MockOcrEngine::failing();
        assert!(engine.recognize(b"a").await.is_err());
        assert_eq!(engine.call_count(), 1);
    }

    #[cfg(feature = "ocr")]
    #[test]
    fn tesseract_rejects_missing_traineddata() {
        let dir = tempfile::tempdir().unwrap();
        let result = TesseractOcr::new(dir.path(), "eng");
        assert!(matches!(result, Err(ExtractionError::Ocr(_))));
    }
}
