//! Binding of the validated, recalculated draft onto the typed [`Invoice`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::aggregate::TaxBucket;
use super::draft::json_type_name;
use super::error::BindError;
use super::recalc::PricedLine;
use super::staging::StagedInvoice;
use super::types::*;

/// Values substituted for optional fields the draft leaves out.
///
/// Defaults must satisfy the same code formats as draft values; [`bind`]
/// rejects them under the `defaults.*` path otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingDefaults {
    /// Used when `dokument.waehrung` is absent.
    pub currency_code: String,
    /// Used when an address has no `land`.
    pub country_code: String,
    /// `chrono` format strings tried in order for every date field.
    pub date_formats: Vec<String>,
}

const CURRENCY_CODE: &str = "ISO 4217 currency code";
const COUNTRY_CODE: &str = "ISO 3166-1 alpha-2 country code";

impl BindingDefaults {
    /// Check the configured codes and date formats.
    pub fn validate(&self) -> Result<(), BindError> {
        self.resolve().map(|_| ())
    }

    /// Uppercased currency and country codes.
    fn resolve(&self) -> Result<(String, String), BindError> {
        let currency =
            checked_code(&self.currency_code, 3, CURRENCY_CODE, "defaults.currency_code")?;
        let country =
            checked_code(&self.country_code, 2, COUNTRY_CODE, "defaults.country_code")?;
        if self.date_formats.is_empty() {
            return Err(BindError::InvalidValue {
                path: "defaults.date_formats".to_string(),
                reason: "at least one date format is required".to_string(),
            });
        }
        Ok((currency, country))
    }
}

impl Default for BindingDefaults {
    fn default() -> Self {
        Self {
            currency_code: "EUR".to_string(),
            country_code: "DE".to_string(),
            date_formats: vec!["%Y-%m-%d".to_string(), "%d.%m.%Y".to_string()],
        }
    }
}

/// Consume the staged draft and produce the canonical record.
///
/// All-or-nothing: the first missing or malformed field aborts binding.
pub fn bind(staged: StagedInvoice, defaults: &BindingDefaults) -> Result<Invoice, BindError> {
    let (currency, country) = defaults.resolve()?;
    let (draft, priced, buckets, totals) = staged.into_parts();
    let root = Value::Object(draft.into_inner());
    let root = Field::root(&root);

    let document = bind_document(
        &root.child("dokument").object()?,
        &defaults.date_formats,
        &currency,
    )?;
    let seller = bind_party(&root.child("verkaeufer").object()?, &country)?;
    let buyer = bind_party(&root.child("kaeufer").object()?, &country)?;
    let lines = bind_lines(&root.child("positionen"), &priced)?;
    let vat_breakdown = buckets.as_deref().map(bind_breakdown).transpose()?;
    let payment = bind_payment(&root.child("zahlung").object()?)?;
    let remarks = bind_remarks(&root.child("bemerkungen"))?;

    Ok(Invoice {
        document,
        seller,
        buyer,
        lines,
        vat_breakdown,
        totals,
        payment,
        remarks,
    })
}

fn bind_document(
    doc: &Field<'_>,
    date_formats: &[String],
    default_currency: &str,
) -> Result<DocumentInfo, BindError> {
    let number = doc.child("rechnungsnummer").required_text()?;

    let kind_field = doc.child("rechnungsart");
    let label = kind_field.required_text()?;
    let kind = InvoiceKind::from_label(&label).ok_or_else(|| BindError::InvalidValue {
        path: kind_field.path.clone(),
        reason: format!("unknown invoice type '{label}'"),
    })?;

    let issue_date_field = doc.child("rechnungsdatum");
    let issue_date = issue_date_field
        .date(date_formats)?
        .ok_or_else(|| issue_date_field.missing())?;
    let due_date = doc.child("faelligkeitsdatum").date(date_formats)?;

    let currency_code = doc
        .child("waehrung")
        .letter_code(3, CURRENCY_CODE)?
        .unwrap_or_else(|| default_currency.to_string());

    Ok(DocumentInfo {
        number,
        kind,
        issue_date,
        due_date,
        currency_code,
    })
}

fn bind_party(party: &Field<'_>, default_country: &str) -> Result<Party, BindError> {
    let address = party.child("anschrift").object()?;

    Ok(Party {
        name: party.child("name").required_text()?,
        vat_id: party.child("umsatzsteuer_id").optional_text()?,
        tax_number: party.child("steuernummer").optional_text()?,
        address: Address {
            street: address.child("strasse").required_text()?,
            postal_code: address.child("plz").required_text()?,
            city: address.child("ort").required_text()?,
            country_code: address
                .child("land")
                .letter_code(2, COUNTRY_CODE)?
                .unwrap_or_else(|| default_country.to_string()),
        },
    })
}

fn bind_lines(items: &Field<'_>, priced: &[PricedLine]) -> Result<Vec<LineItem>, BindError> {
    priced
        .iter()
        .map(|line| {
            let item = items.index(line.index);
            item.child("menge").require_present()?;
            item.child("einzelpreis_netto").require_present()?;

            let tax = item.child("umsatzsteuer").object()?;
            tax.child("satz").require_present()?;

            Ok(LineItem {
                position: item.child("positionsnummer").position_number()?,
                description: item.child("beschreibung").required_text()?,
                quantity: line.quantity,
                unit: item.child("einheit").required_text()?,
                unit_price: line.unit_price,
                line_amount: line.line_amount,
                tax: LineTax {
                    category: parse_category(&line.tax_category, &tax.child("kategorie").path)?,
                    rate: line.tax_rate,
                },
            })
        })
        .collect()
}

fn bind_breakdown(buckets: &[TaxBucket]) -> Result<Vec<VatBreakdown>, BindError> {
    buckets
        .iter()
        .enumerate()
        .map(|(i, b)| {
            Ok(VatBreakdown {
                category: parse_category(
                    &b.category,
                    &format!("umsatzsteuer_aufschluesselung[{i}].kategorie"),
                )?,
                rate: b.rate,
                taxable_amount: b.taxable_basis,
                tax_amount: b.tax_amount,
            })
        })
        .collect()
}

fn bind_payment(payment: &Field<'_>) -> Result<PaymentInstructions, BindError> {
    Ok(PaymentInstructions {
        method: payment.child("zahlungsart").required_text()?,
        iban: payment
            .child("iban")
            .optional_text()?
            .map(|iban| iban.split_whitespace().collect::<String>().to_ascii_uppercase()),
        bic: payment
            .child("bic")
            .optional_text()?
            .map(|bic| bic.to_ascii_uppercase()),
    })
}

fn bind_remarks(remarks: &Field<'_>) -> Result<Option<Vec<Remark>>, BindError> {
    let Some(value) = remarks.value() else {
        return Ok(None);
    };
    let Value::Array(items) = value else {
        return Err(remarks.wrong_type("array", value));
    };

    (0..items.len())
        .map(|i| {
            let item = remarks.index(i);
            let text = match item.value() {
                Some(Value::String(_)) => item.required_text()?,
                _ => item.object()?.child("text").required_text()?,
            };
            Ok(Remark { text })
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

fn parse_category(code: &str, path: &str) -> Result<TaxCategory, BindError> {
    TaxCategory::from_code(code).ok_or_else(|| BindError::InvalidValue {
        path: path.to_string(),
        reason: format!("unknown tax category '{code}'"),
    })
}

/// `text` as an uppercase ASCII letter code of exactly `len` characters.
fn checked_code(text: &str, len: usize, what: &str, path: &str) -> Result<String, BindError> {
    let text = text.trim();
    if text.len() != len || !text.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(BindError::InvalidValue {
            path: path.to_string(),
            reason: format!("expected a {what}, got '{text}'"),
        });
    }
    Ok(text.to_ascii_uppercase())
}

/// A possibly-absent draft value together with its path for error reporting.
struct Field<'a> {
    path: String,
    raw: Option<&'a Value>,
}

impl<'a> Field<'a> {
    fn root(value: &'a Value) -> Self {
        Self {
            path: String::new(),
            raw: Some(value),
        }
    }

    fn child(&self, key: &str) -> Field<'a> {
        let path = if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{key}", self.path)
        };
        Field {
            path,
            raw: self.raw.and_then(|v| v.get(key)),
        }
    }

    fn index(&self, i: usize) -> Field<'a> {
        Field {
            path: format!("{}[{i}]", self.path),
            raw: self.raw.and_then(|v| v.get(i)),
        }
    }

    /// The value, treating `null` as absent.
    fn value(&self) -> Option<&'a Value> {
        self.raw.filter(|v| !v.is_null())
    }

    fn missing(&self) -> BindError {
        BindError::MissingField {
            path: self.path.clone(),
        }
    }

    fn wrong_type(&self, expected: &str, found: &Value) -> BindError {
        BindError::InvalidValue {
            path: self.path.clone(),
            reason: format!("expected {expected}, got {}", json_type_name(found)),
        }
    }

    fn require_present(&self) -> Result<(), BindError> {
        self.value().map(|_| ()).ok_or_else(|| self.missing())
    }

    /// A required nested record.
    fn object(&self) -> Result<Field<'a>, BindError> {
        match self.value() {
            None => Err(self.missing()),
            Some(v @ Value::Object(_)) => Ok(Field {
                path: self.path.clone(),
                raw: Some(v),
            }),
            Some(other) => Err(self.wrong_type("object", other)),
        }
    }

    /// Trimmed text; numbers are accepted and written out as text.
    /// Blank strings count as absent.
    fn optional_text(&self) -> Result<Option<String>, BindError> {
        match self.value() {
            None => Ok(None),
            Some(Value::String(s)) => {
                let trimmed = s.trim();
                Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
            }
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(other) => Err(self.wrong_type("text", other)),
        }
    }

    fn required_text(&self) -> Result<String, BindError> {
        self.optional_text()?.ok_or_else(|| self.missing())
    }

    fn date(&self, formats: &[String]) -> Result<Option<NaiveDate>, BindError> {
        let Some(text) = self.optional_text()? else {
            return Ok(None);
        };
        formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(&text, fmt).ok())
            .map(Some)
            .ok_or_else(|| BindError::InvalidDate {
                path: self.path.clone(),
                value: text,
            })
    }

    /// An uppercase ASCII letter code of exactly `len` characters.
    fn letter_code(&self, len: usize, what: &str) -> Result<Option<String>, BindError> {
        match self.optional_text()? {
            None => Ok(None),
            Some(text) => checked_code(&text, len, what, &self.path).map(Some),
        }
    }

    /// A positive line number given as an integer, an integral float or a
    /// digit string.
    fn position_number(&self) -> Result<u32, BindError> {
        let invalid = |shown: String| BindError::InvalidValue {
            path: self.path.clone(),
            reason: format!("expected a line number, got {shown}"),
        };
        match self.value() {
            None => Err(self.missing()),
            Some(Value::Number(n)) => {
                if let Some(u) = n.as_u64() {
                    u32::try_from(u).map_err(|_| invalid(n.to_string()))
                } else {
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && (0.0..=f64::from(u32::MAX)).contains(&f) => {
                            Ok(f as u32)
                        }
                        _ => Err(invalid(n.to_string())),
                    }
                }
            }
            Some(Value::String(s)) if s.trim().is_empty() => Err(self.missing()),
            Some(Value::String(s)) => s.trim().parse::<u32>().map_err(|_| invalid(format!("'{s}'"))),
            Some(other) => Err(self.wrong_type("integer", other)),
        }
    }
}
