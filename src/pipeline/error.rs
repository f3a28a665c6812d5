use std::path::PathBuf;
use thiserror::Error;

use crate::core::{NormalizeError, RechnungError};

/// Fatal errors of the document pipeline. The document being processed is
/// abandoned; outputs already written for it are left in place.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Reading or writing a file failed.
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No registered text extractor handles this file type.
    #[error("unsupported input format: '{extension}'")]
    UnsupportedFormat { extension: String },

    /// A text extractor failed on a supported file.
    #[error("text extraction failed for '{}': {reason}", path.display())]
    Extraction { path: PathBuf, reason: String },

    /// `process_input_file` was called without a draft extractor.
    #[error("no draft extractor configured")]
    NoDraftExtractor,

    /// The draft extractor (usually an LLM) could not produce a draft.
    #[error("draft extraction failed: {0}")]
    DraftExtraction(String),

    /// The draft was rejected by normalization.
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    /// A renderer failed.
    #[error("renderer '{renderer}' failed: {source}")]
    Render {
        renderer: String,
        #[source]
        source: RechnungError,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
