//! Decimal helpers shared by the recalculation, aggregation and totals stages.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde_json::Value;

use super::draft::json_type_name;
use super::error::NormalizeError;

/// Currency precision used for every monetary value.
pub const CURRENCY_DP: u32 = 2;

/// Largest accepted magnitude for quantities and unit prices.
pub const MAX_QUANTITY_OR_PRICE: Decimal = dec!(1000000000);

/// Largest accepted magnitude for a tax rate in percent.
pub const MAX_TAX_RATE: Decimal = dec!(100);

/// Round to currency precision using half-up (commercial rounding).
///
/// Ties go away from zero: `30.015` becomes `30.02`, `-0.005` becomes `-0.01`.
/// The result always carries exactly two decimal places, so `30` becomes `30.00`.
pub fn round_half_up(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(CURRENCY_DP);
    rounded
}

/// Read a JSON number or numeric string as an exact decimal.
///
/// Returns `Ok(None)` when the value is absent or `null`. JSON floats are
/// converted through their shortest textual form, so `9.995` stays `9.995`
/// instead of picking up binary floating-point noise.
pub fn coerce_decimal(value: Option<&Value>, path: &str) -> Result<Option<Decimal>, NormalizeError> {
    let unreadable = |shown: String, text: &str| {
        if is_finite_number(text) {
            NormalizeError::OutOfRange {
                path: path.to_string(),
                value: shown,
            }
        } else {
            NormalizeError::NotNumeric {
                path: path.to_string(),
                value: shown,
            }
        }
    };

    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(Some(Decimal::from(i)))
            } else if let Some(u) = n.as_u64() {
                Ok(Some(Decimal::from(u)))
            } else {
                let text = n.to_string();
                parse_decimal(&text)
                    .map(Some)
                    .ok_or_else(|| unreadable(text.clone(), &text))
            }
        }
        Some(Value::String(s)) => parse_decimal(s)
            .map(Some)
            .ok_or_else(|| unreadable(format!("{s:?}"), s)),
        Some(other) => Err(NormalizeError::NotNumeric {
            path: path.to_string(),
            value: json_type_name(other).to_string(),
        }),
    }
}

/// Like [`coerce_decimal`], additionally rejecting magnitudes above `max`.
pub fn coerce_bounded(
    value: Option<&Value>,
    path: &str,
    max: Decimal,
) -> Result<Option<Decimal>, NormalizeError> {
    let parsed = coerce_decimal(value, path)?;
    if let Some(d) = parsed {
        if d.abs() > max {
            return Err(NormalizeError::OutOfRange {
                path: path.to_string(),
                value: d.to_string(),
            });
        }
    }
    Ok(parsed)
}

/// A finite number `Decimal` cannot hold, e.g. `1e300` or `1e-300`.
fn is_finite_number(text: &str) -> bool {
    text.trim().parse::<f64>().is_ok_and(f64::is_finite)
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}
