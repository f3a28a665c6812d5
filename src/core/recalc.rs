use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use super::draft::json_type_name;
use super::error::NormalizeError;
use super::money::{MAX_QUANTITY_OR_PRICE, MAX_TAX_RATE, coerce_bounded, round_half_up};

/// Tax category applied when a line has no usable `umsatzsteuer.kategorie`.
pub const DEFAULT_TAX_CATEGORY: &str = "S";

/// A line item after deterministic recalculation.
///
/// `line_amount` is always `round_half_up(quantity * unit_price)`; whatever
/// amount the draft carried is discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedLine {
    /// Zero-based index into the draft's `positionen`.
    pub index: usize,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub line_amount: Decimal,
    /// Raw UNTDID 5305 code as extracted, defaulted to `S`.
    pub tax_category: String,
    /// Percent, defaulted to 0.
    pub tax_rate: Decimal,
}

/// Recompute every line amount from quantity and unit price.
///
/// Absent or `null` quantities and prices count as zero. A value that is
/// present but not numeric rejects the whole document.
pub fn recalculate_lines(items: &[Value]) -> Result<Vec<PricedLine>, NormalizeError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| price_line(index, item))
        .collect()
}

fn price_line(index: usize, item: &Value) -> Result<PricedLine, NormalizeError> {
    let prefix = format!("positionen[{index}]");

    let quantity = coerce_bounded(
        item.get("menge"),
        &format!("{prefix}.menge"),
        MAX_QUANTITY_OR_PRICE,
    )?
    .unwrap_or(Decimal::ZERO);
    let unit_price = coerce_bounded(
        item.get("einzelpreis_netto"),
        &format!("{prefix}.einzelpreis_netto"),
        MAX_QUANTITY_OR_PRICE,
    )?
    .unwrap_or(Decimal::ZERO);

    let line_amount = round_half_up(quantity * unit_price);

    let (tax_category, tax_rate) = read_tax(item.get("umsatzsteuer"), &prefix)?;

    debug!(
        line = index,
        %quantity,
        %unit_price,
        %line_amount,
        "recalculated line amount"
    );

    Ok(PricedLine {
        index,
        quantity,
        unit_price,
        line_amount,
        tax_category,
        tax_rate,
    })
}

fn read_tax(tax: Option<&Value>, prefix: &str) -> Result<(String, Decimal), NormalizeError> {
    let tax = match tax {
        None | Some(Value::Null) => {
            return Ok((DEFAULT_TAX_CATEGORY.to_string(), Decimal::ZERO));
        }
        Some(obj @ Value::Object(_)) => obj,
        Some(other) => {
            return Err(NormalizeError::shape(
                format!("{prefix}.umsatzsteuer"),
                "object",
                json_type_name(other),
            ));
        }
    };

    let category = match tax.get("kategorie") {
        None | Some(Value::Null) => DEFAULT_TAX_CATEGORY.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => DEFAULT_TAX_CATEGORY.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return Err(NormalizeError::shape(
                format!("{prefix}.umsatzsteuer.kategorie"),
                "string",
                json_type_name(other),
            ));
        }
    };

    let rate = coerce_bounded(
        tax.get("satz"),
        &format!("{prefix}.umsatzsteuer.satz"),
        MAX_TAX_RATE,
    )?
    .unwrap_or(Decimal::ZERO)
    .normalize();

    Ok((category, rate))
}
