//! EN 16931-derived business rules checked before binding.
//!
//! This is a deliberately small subset of the standard. Rules run in table
//! order and the first violation wins, so a draft with a bad invoice type and
//! no lines reports the invoice type.

use rust_decimal::Decimal;
use serde_json::Value;

use super::error::RuleViolation;
use super::staging::StagedInvoice;
use super::types::InvoiceKind;

/// A single business rule over the staged draft.
pub type Rule = fn(&StagedInvoice) -> Result<(), RuleViolation>;

/// Rules in evaluation order. Append new rules at the end.
pub const BASIC_RULES: &[Rule] = &[check_invoice_type, check_has_lines, check_non_negative];

/// Run [`BASIC_RULES`], stopping at the first violation.
pub fn validate_rules(staged: &StagedInvoice) -> Result<(), RuleViolation> {
    validate_with(staged, BASIC_RULES)
}

/// Run an arbitrary ordered rule table, stopping at the first violation.
pub fn validate_with(staged: &StagedInvoice, rules: &[Rule]) -> Result<(), RuleViolation> {
    rules.iter().try_for_each(|rule| rule(staged))
}

/// BR-04: the invoice type must be a standard invoice or a credit note.
pub fn check_invoice_type(staged: &StagedInvoice) -> Result<(), RuleViolation> {
    match staged.draft().invoice_type() {
        Some(Value::String(label)) if InvoiceKind::from_label(label).is_some() => Ok(()),
        Some(Value::String(label)) => Err(RuleViolation::InvalidInvoiceType {
            found: Some(label.clone()),
        }),
        // non-strings are reported as their JSON text, e.g. `380`
        other => Err(RuleViolation::InvalidInvoiceType {
            found: other.map(Value::to_string),
        }),
    }
}

/// BR-16: at least one invoice line.
pub fn check_has_lines(staged: &StagedInvoice) -> Result<(), RuleViolation> {
    if staged.lines().is_empty() {
        return Err(RuleViolation::NoLineItems);
    }
    Ok(())
}

/// Quantity, unit price and line amount must not be negative.
pub fn check_non_negative(staged: &StagedInvoice) -> Result<(), RuleViolation> {
    for line in staged.lines() {
        let fields = [
            ("menge", line.quantity),
            ("einzelpreis_netto", line.unit_price),
            ("positionsbetrag_netto", line.line_amount),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(RuleViolation::NegativeValue {
                    line: line.index,
                    field,
                    value,
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::draft::Draft;
    use rust_decimal_macros::dec;
    use serde_json::{Value, json};

    fn staged(value: Value) -> StagedInvoice {
        StagedInvoice::stage(Draft::from_value(value).unwrap()).unwrap()
    }

    #[test]
    fn accepts_invoice_and_credit_note() {
        for kind in ["RECHNUNG", "GUTSCHRIFT"] {
            let s = staged(json!({
                "dokument": {"rechnungsart": kind},
                "positionen": [{"menge": 1, "einzelpreis_netto": 10}]
            }));
            assert_eq!(validate_rules(&s), Ok(()));
        }
    }

    #[test]
    fn rejects_unknown_type() {
        let s = staged(json!({
            "dokument": {"rechnungsart": "ANGEBOT"},
            "positionen": [{"menge": 1, "einzelpreis_netto": 10}]
        }));
        assert_eq!(
            validate_rules(&s),
            Err(RuleViolation::InvalidInvoiceType {
                found: Some("ANGEBOT".into())
            })
        );
    }

    #[test]
    fn missing_document_is_invalid_type() {
        let s = staged(json!({"positionen": [{"menge": 1, "einzelpreis_netto": 10}]}));
        assert_eq!(
            validate_rules(&s),
            Err(RuleViolation::InvalidInvoiceType { found: None })
        );
    }

    #[test]
    fn numeric_type_is_reported_as_given() {
        let s = staged(json!({
            "dokument": {"rechnungsart": 380},
            "positionen": [{"menge": 1, "einzelpreis_netto": 10}]
        }));
        let err = validate_rules(&s).unwrap_err();
        assert_eq!(err, RuleViolation::InvalidInvoiceType { found: Some("380".into()) });
        assert!(err.to_string().contains("'380'"));
    }

    #[test]
    fn null_type_is_missing() {
        let s = staged(json!({
            "dokument": {"rechnungsart": null},
            "positionen": [{"menge": 1, "einzelpreis_netto": 10}]
        }));
        assert_eq!(
            validate_rules(&s),
            Err(RuleViolation::InvalidInvoiceType { found: None })
        );
    }

    #[test]
    fn type_check_precedes_empty_check() {
        let s = staged(json!({"dokument": {"rechnungsart": "rechnung"}, "positionen": []}));
        assert!(matches!(
            validate_rules(&s),
            Err(RuleViolation::InvalidInvoiceType { .. })
        ));
    }

    #[test]
    fn first_negative_line_wins() {
        let s = staged(json!({
            "dokument": {"rechnungsart": "RECHNUNG"},
            "positionen": [
                {"menge": 1, "einzelpreis_netto": 10},
                {"menge": 2, "einzelpreis_netto": -3},
                {"menge": -1, "einzelpreis_netto": 4}
            ]
        }));
        assert_eq!(
            validate_rules(&s),
            Err(RuleViolation::NegativeValue {
                line: 1,
                field: "einzelpreis_netto",
                value: dec!(-3)
            })
        );
    }

    #[test]
    fn custom_rule_table_keeps_order() {
        fn always_fails(_: &StagedInvoice) -> Result<(), RuleViolation> {
            Err(RuleViolation::NoLineItems)
        }
        let s = staged(json!({"dokument": {"rechnungsart": "X"}}));
        assert_eq!(
            validate_with(&s, &[always_fails, check_invoice_type]),
            Err(RuleViolation::NoLineItems)
        );
    }
}
