use serde_json::Value;
use tracing::{debug, info, warn};

use super::binding::{BindingDefaults, bind};
use super::draft::Draft;
use super::error::NormalizeError;
use super::rules::validate_rules;
use super::staging::StagedInvoice;
use super::types::Invoice;

/// Turn an LLM-produced draft into a canonical [`Invoice`].
///
/// Stages run in a fixed order: shape check, line recalculation, tax
/// aggregation, totals, business rules, binding. Every stage is
/// fail-fast and the first error aborts the whole call.
///
/// Feeding the JSON form of a returned invoice back in yields an equal
/// invoice.
///
/// ```
/// use rechnung_konverter::core::*;
/// use rust_decimal_macros::dec;
/// use serde_json::json;
///
/// let draft = json!({
///     "dokument": {"rechnungsnummer": "RE-1", "rechnungsart": "RECHNUNG", "rechnungsdatum": "2024-06-15"},
///     "verkaeufer": {"name": "ACME GmbH", "anschrift": {"strasse": "Hauptstr. 1", "plz": "10115", "ort": "Berlin"}},
///     "kaeufer": {"name": "Kunde AG", "anschrift": {"strasse": "Marienplatz 1", "plz": "80331", "ort": "München"}},
///     "positionen": [{
///         "positionsnummer": 1, "beschreibung": "Beratung", "menge": 10, "einheit": "Std",
///         "einzelpreis_netto": 150, "umsatzsteuer": {"kategorie": "S", "satz": 19}
///     }],
///     "zahlung": {"zahlungsart": "SEPA"}
/// });
///
/// let invoice = normalize(draft, &BindingDefaults::default()).unwrap();
/// assert_eq!(invoice.totals.gross_total, dec!(1785.00));
/// ```
pub fn normalize(draft: Value, defaults: &BindingDefaults) -> Result<Invoice, NormalizeError> {
    let result = run(draft, defaults);
    match &result {
        Ok(invoice) => info!(
            number = %invoice.document.number,
            lines = invoice.lines.len(),
            gross = %invoice.totals.gross_total,
            "normalized invoice draft"
        ),
        Err(e) => warn!(kind = ?e.kind(), error = %e, "rejected invoice draft"),
    }
    result
}

fn run(draft: Value, defaults: &BindingDefaults) -> Result<Invoice, NormalizeError> {
    let draft = Draft::from_value(draft)?;
    let staged = StagedInvoice::stage(draft)?;
    validate_rules(&staged)?;
    debug!("business rules passed");
    Ok(bind(staged, defaults)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn public_types_are_thread_safe() {
        assert_send_sync::<Invoice>();
        assert_send_sync::<StagedInvoice>();
        assert_send_sync::<BindingDefaults>();
        assert_send_sync::<NormalizeError>();
    }

    #[test]
    fn rejects_non_object_draft() {
        let err = normalize(serde_json::json!([1, 2]), &BindingDefaults::default()).unwrap_err();
        assert_eq!(err.kind(), crate::core::ErrorKind::InputShape);
    }
}
