use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while turning a draft into a canonical invoice.
///
/// Every variant is fatal for the document being processed; nothing is
/// retried and no partial record is ever produced.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NormalizeError {
    /// The draft (or one of its structural members) has the wrong JSON shape.
    #[error("malformed draft at '{path}': expected {expected}, got {found}")]
    InputShape {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// The draft exceeds the supported number of line items.
    #[error("draft has {count} line items, at most {max} are supported")]
    TooManyLines { count: usize, max: usize },

    /// A numeric field is present but cannot be read as a decimal number.
    #[error("field '{path}' is not numeric: {value}")]
    NotNumeric { path: String, value: String },

    /// A numeric field is outside the range the arithmetic supports.
    #[error("field '{path}' is out of range: {value}")]
    OutOfRange { path: String, value: String },

    /// A business rule rejected the draft.
    #[error("business rule violated: {0}")]
    Rule(#[from] RuleViolation),

    /// The validated draft could not be bound onto the canonical record.
    #[error("binding failed: {0}")]
    Binding(#[from] BindError),
}

/// Coarse classification of [`NormalizeError`] for callers that only need
/// to decide how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InputShape,
    NumericCoercion,
    BusinessRule,
    Binding,
}

impl NormalizeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InputShape { .. } | Self::TooManyLines { .. } => ErrorKind::InputShape,
            Self::NotNumeric { .. } | Self::OutOfRange { .. } => ErrorKind::NumericCoercion,
            Self::Rule(_) => ErrorKind::BusinessRule,
            Self::Binding(_) => ErrorKind::Binding,
        }
    }

    pub(crate) fn shape(
        path: impl Into<String>,
        expected: &'static str,
        found: &'static str,
    ) -> Self {
        Self::InputShape {
            path: path.into(),
            expected,
            found,
        }
    }
}

/// A violated business rule. The validator stops at the first one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleViolation {
    /// `dokument.rechnungsart` is absent or not one of the supported types.
    #[error("invalid invoice type {}: expected RECHNUNG or GUTSCHRIFT", describe_found(.found))]
    InvalidInvoiceType { found: Option<String> },

    /// `positionen` is absent or empty.
    #[error("invoice must have at least one line item")]
    NoLineItems,

    /// A line carries a negative quantity, price or amount.
    #[error("line {line}: {field} must not be negative, got {value}")]
    NegativeValue {
        /// Zero-based index into `positionen`.
        line: usize,
        /// Draft field name, e.g. `menge`.
        field: &'static str,
        value: Decimal,
    },
}

impl RuleViolation {
    /// Closest EN 16931 business rule ID, where one exists.
    pub fn rule(&self) -> Option<&'static str> {
        match self {
            Self::InvalidInvoiceType { .. } => Some("BR-04"),
            Self::NoLineItems => Some("BR-16"),
            Self::NegativeValue {
                field: "einzelpreis_netto",
                ..
            } => Some("BR-27"),
            Self::NegativeValue { .. } => None,
        }
    }
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(s) => format!("'{s}'"),
        None => "(missing)".to_string(),
    }
}

/// Failure while binding the validated draft onto the typed record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// A required field is absent, null or blank.
    #[error("missing required field '{path}'")]
    MissingField { path: String },

    /// A date field does not match any accepted format.
    #[error("field '{path}' is not a valid date: '{value}'")]
    InvalidDate { path: String, value: String },

    /// A field is present but has the wrong type or format.
    #[error("field '{path}' is invalid: {reason}")]
    InvalidValue { path: String, reason: String },
}

impl BindError {
    /// Dot-separated path of the failing field (e.g. `verkaeufer.anschrift.land`).
    pub fn path(&self) -> &str {
        match self {
            Self::MissingField { path }
            | Self::InvalidDate { path, .. }
            | Self::InvalidValue { path, .. } => path,
        }
    }
}

/// Errors from the XML renderers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RechnungError {
    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),
}
