use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::money::round_half_up;
use super::recalc::PricedLine;

/// Lines sharing one `(category, rate)` key.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxBucket {
    pub category: String,
    pub rate: Decimal,
    /// Sum of member line amounts, re-rounded after every addition.
    pub taxable_basis: Decimal,
    /// Sum of per-line rounded tax, re-rounded after every addition.
    pub tax_amount: Decimal,
}

/// Group recalculated lines by `(category, rate)` in first-seen order.
///
/// Tax is computed per line (`round(amount * rate / 100)`) and accumulated,
/// not computed once from the bucket's basis. The two approaches differ for
/// some quantity/rate combinations; this one matches per-line auditing.
pub fn aggregate_taxes(lines: &[PricedLine]) -> Vec<TaxBucket> {
    let mut buckets: Vec<TaxBucket> = Vec::new();

    for line in lines {
        let line_tax = round_half_up(line.line_amount * line.tax_rate / dec!(100));

        match buckets
            .iter_mut()
            .find(|b| b.category == line.tax_category && b.rate == line.tax_rate)
        {
            Some(bucket) => {
                bucket.taxable_basis = round_half_up(bucket.taxable_basis + line.line_amount);
                bucket.tax_amount = round_half_up(bucket.tax_amount + line_tax);
            }
            None => buckets.push(TaxBucket {
                category: line.tax_category.clone(),
                rate: line.tax_rate,
                taxable_basis: round_half_up(line.line_amount),
                tax_amount: line_tax,
            }),
        }
    }

    buckets
}
