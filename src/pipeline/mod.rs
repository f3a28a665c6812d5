//! File-level orchestration around [`normalize`].
//!
//! ```text
//! input file ─▶ TextExtractor ─▶ sanitize_text ─▶ DraftExtractor ─▶ normalize ─▶ Renderers
//!                                   │                                   │
//!                       _working/raw_text.txt              <number>/canonical.json
//! ```
//!
//! One document at a time; a failure in any step abandons the document.

mod error;
mod extract;
mod render;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::core::{BindingDefaults, Invoice, normalize};

pub use error::PipelineError;
pub use extract::{DraftExtractor, PlainTextExtractor, TextExtractor, sanitize_text};
#[cfg(feature = "xrechnung")]
pub use render::{CiiRenderer, UblRenderer};
pub use render::Renderer;

/// Scratch directory under the output root for intermediate files.
pub const WORKING_DIR: &str = "_working";

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Success,
}

/// What was written, and where.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessingReport {
    pub status: ProcessingStatus,
    #[serde(rename = "rechnungsnummer")]
    pub invoice_number: String,
    pub output_directory: PathBuf,
    /// Report key (e.g. `canonical_json`) to written file.
    pub files: BTreeMap<String, PathBuf>,
}

/// The configured chain of extractors and renderers.
pub struct Pipeline {
    extractors: Vec<Box<dyn TextExtractor>>,
    drafter: Option<Box<dyn DraftExtractor>>,
    renderers: Vec<Box<dyn Renderer>>,
    defaults: BindingDefaults,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Plain-text extraction, the XML renderers (with feature `xrechnung`)
    /// and no draft extractor.
    pub fn new() -> Self {
        let renderers: Vec<Box<dyn Renderer>> = {
            #[cfg(feature = "xrechnung")]
            {
                vec![Box::new(UblRenderer), Box::new(CiiRenderer)]
            }
            #[cfg(not(feature = "xrechnung"))]
            {
                Vec::new()
            }
        };

        Self {
            extractors: vec![Box::new(PlainTextExtractor)],
            drafter: None,
            renderers,
            defaults: BindingDefaults::default(),
        }
    }

    /// Register a text extractor. Later registrations win for shared extensions.
    pub fn with_text_extractor(mut self, extractor: impl TextExtractor + 'static) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    pub fn with_draft_extractor(mut self, drafter: impl DraftExtractor + 'static) -> Self {
        self.drafter = Some(Box::new(drafter));
        self
    }

    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderers.push(Box::new(renderer));
        self
    }

    /// Drop all renderers, including the built-in ones.
    pub fn without_renderers(mut self) -> Self {
        self.renderers.clear();
        self
    }

    pub fn with_defaults(mut self, defaults: BindingDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn defaults(&self) -> &BindingDefaults {
        &self.defaults
    }

    /// Run the whole chain for one input document.
    pub fn process_input_file(
        &self,
        input: &Path,
        output_root: &Path,
    ) -> Result<ProcessingReport, PipelineError> {
        info!(input = %input.display(), "processing input file");

        let drafter = self.drafter.as_ref().ok_or(PipelineError::NoDraftExtractor)?;

        let extension = extract::extension_of(input);
        let extractor = self
            .extractors
            .iter()
            .rev()
            .find(|e| e.extensions().iter().any(|ext| *ext == extension))
            .ok_or_else(|| PipelineError::UnsupportedFormat {
                extension: extension.clone(),
            })?;

        let text = sanitize_text(&extractor.extract(input)?);
        let work_dir = output_root.join(WORKING_DIR);
        create_dir(&work_dir)?;
        let raw_text_path = work_dir.join("raw_text.txt");
        write_file(&raw_text_path, text.as_bytes())?;
        info!(chars = text.len(), path = %raw_text_path.display(), "extracted raw text");

        let draft = drafter.extract_draft(&text)?;
        let invoice = normalize(draft, &self.defaults)?;

        let mut report = self.export(&invoice, output_root)?;
        report
            .files
            .insert("raw_text".to_string(), absolute(&raw_text_path));
        Ok(report)
    }

    /// Write `canonical.json` and every renderer's output into
    /// `<output_root>/<invoice number>/`.
    pub fn export(
        &self,
        invoice: &Invoice,
        output_root: &Path,
    ) -> Result<ProcessingReport, PipelineError> {
        let number = &invoice.document.number;
        let out_dir = output_root.join(safe_dir_name(number));
        create_dir(&out_dir)?;

        let mut files = BTreeMap::new();

        let canonical_path = out_dir.join("canonical.json");
        write_file(&canonical_path, invoice.to_canonical_json()?.as_bytes())?;
        files.insert("canonical_json".to_string(), absolute(&canonical_path));

        for renderer in &self.renderers {
            let path = out_dir.join(renderer.file_name());
            write_file(&path, &renderer.render(invoice)?)?;
            files.insert(renderer.name().to_string(), absolute(&path));
        }

        info!(number = %number, dir = %out_dir.display(), files = files.len(), "exported invoice");

        Ok(ProcessingReport {
            status: ProcessingStatus::Success,
            invoice_number: number.clone(),
            output_directory: absolute(&out_dir),
            files,
        })
    }
}

/// Map an invoice number to a single, harmless path component.
pub fn safe_dir_name(number: &str) -> String {
    let replaced: String = number
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = replaced.trim_matches('.');
    if trimmed.is_empty() {
        "unnamed".to_string()
    } else {
        trimmed.to_string()
    }
}

fn create_dir(path: &Path) -> Result<(), PipelineError> {
    fs::create_dir_all(path).map_err(|e| PipelineError::io(path, e))
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), PipelineError> {
    fs::write(path, contents).map_err(|e| PipelineError::io(path, e))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
