use crate::core::Invoice;

use super::PipelineError;

/// Produces one output file from the canonical record.
pub trait Renderer: Send + Sync {
    /// Key under which the written file appears in the
    /// [`ProcessingReport`](super::ProcessingReport).
    fn name(&self) -> &str;

    /// File name inside the invoice's output directory.
    fn file_name(&self) -> &str;

    fn render(&self, invoice: &Invoice) -> Result<Vec<u8>, PipelineError>;
}

/// XRechnung UBL, written as `xrechnung.xml`.
#[cfg(feature = "xrechnung")]
#[derive(Debug, Default, Clone, Copy)]
pub struct UblRenderer;

#[cfg(feature = "xrechnung")]
impl Renderer for UblRenderer {
    fn name(&self) -> &str {
        "xrechnung_xml"
    }

    fn file_name(&self) -> &str {
        "xrechnung.xml"
    }

    fn render(&self, invoice: &Invoice) -> Result<Vec<u8>, PipelineError> {
        crate::xrechnung::to_ubl_xml(invoice)
            .map(String::into_bytes)
            .map_err(|source| PipelineError::Render {
                renderer: self.name().to_string(),
                source,
            })
    }
}

/// ZUGFeRD/CII XML, written as `zugferd.xml`.
#[cfg(feature = "xrechnung")]
#[derive(Debug, Default, Clone, Copy)]
pub struct CiiRenderer;

#[cfg(feature = "xrechnung")]
impl Renderer for CiiRenderer {
    fn name(&self) -> &str {
        "zugferd_xml"
    }

    fn file_name(&self) -> &str {
        "zugferd.xml"
    }

    fn render(&self, invoice: &Invoice) -> Result<Vec<u8>, PipelineError> {
        crate::xrechnung::to_cii_xml(invoice)
            .map(String::into_bytes)
            .map_err(|source| PipelineError::Render {
                renderer: self.name().to_string(),
                source,
            })
    }
}
