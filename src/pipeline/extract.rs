use std::fs;
use std::path::Path;

use serde_json::Value;

use super::PipelineError;

/// Reads the text content of an input document.
pub trait TextExtractor: Send + Sync {
    /// Lower-case file extensions (without the dot) this extractor handles.
    fn extensions(&self) -> &[&'static str];

    fn extract(&self, path: &Path) -> Result<String, PipelineError>;
}

/// Turns raw invoice text into a loosely structured JSON draft.
///
/// This is where an LLM sits. Its output is untrusted: every value is
/// re-checked by [`normalize`](crate::core::normalize).
pub trait DraftExtractor: Send + Sync {
    fn extract_draft(&self, raw_text: &str) -> Result<Value, PipelineError>;
}

/// Plain `.txt` and `.csv` files. Invalid UTF-8 is replaced, not rejected.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextExtractor;

impl TextExtractor for PlainTextExtractor {
    fn extensions(&self) -> &[&'static str] {
        &["txt", "csv"]
    }

    fn extract(&self, path: &Path) -> Result<String, PipelineError> {
        let bytes = fs::read(path).map_err(|e| PipelineError::io(path, e))?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Trim every line, then the whole text.
pub fn sanitize_text(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Lower-cased extension of `path`, empty when there is none.
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default()
}
