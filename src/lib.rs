//! # rechnung-konverter
//!
//! Turns loosely structured invoice drafts (as produced by an LLM reading a
//! scanned or exported invoice) into a canonical, EN 16931-aligned record,
//! and renders that record as XRechnung UBL or ZUGFeRD/CII XML.
//!
//! All monetary values use [`rust_decimal::Decimal`] and are rounded
//! half-up to two places. Nothing in the numeric path touches floating point.
//!
//! ## Quick Start
//!
//! ```rust
//! use rechnung_konverter::core::*;
//! use rust_decimal_macros::dec;
//! use serde_json::json;
//!
//! let draft = json!({
//!     "dokument": {"rechnungsnummer": "RE-2024-001", "rechnungsart": "RECHNUNG", "rechnungsdatum": "15.06.2024"},
//!     "verkaeufer": {"name": "ACME GmbH", "umsatzsteuer_id": "DE123456789",
//!                    "anschrift": {"strasse": "Friedrichstr. 123", "plz": "10115", "ort": "Berlin"}},
//!     "kaeufer": {"name": "Kunde AG", "anschrift": {"strasse": "Marienplatz 1", "plz": "80331", "ort": "München"}},
//!     "positionen": [
//!         {"positionsnummer": 1, "beschreibung": "Beratung", "menge": "10", "einheit": "Std",
//!          "einzelpreis_netto": "150,00 EUR?", "umsatzsteuer": {"kategorie": "S", "satz": 19}}
//!     ],
//!     "zahlung": {"zahlungsart": "SEPA"}
//! });
//!
//! // "150,00 EUR?" is not a number: the draft is rejected, nothing is produced.
//! let err = normalize(draft.clone(), &BindingDefaults::default()).unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::NumericCoercion);
//!
//! let mut fixed = draft;
//! fixed["positionen"][0]["einzelpreis_netto"] = json!("150.00");
//! let invoice = normalize(fixed, &BindingDefaults::default()).unwrap();
//! assert_eq!(invoice.totals.net_total, dec!(1500.00));
//! assert_eq!(invoice.totals.vat_total, dec!(285.00));
//! assert_eq!(invoice.totals.amount_due, dec!(1785.00));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Draft normalization, business rules, canonical record |
//! | `xrechnung` | UBL and CII XML rendering |
//! | `pipeline` | File pipeline, extractor traits, settings |
//! | `cli` | The `rechnung` command-line tool |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "xrechnung")]
pub mod xrechnung;

#[cfg(feature = "pipeline")]
pub mod config;

#[cfg(feature = "pipeline")]
pub mod pipeline;
