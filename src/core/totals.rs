use rust_decimal::Decimal;

use super::aggregate::TaxBucket;
use super::money::round_half_up;
use super::recalc::PricedLine;
use super::types::Totals;

/// Derive document totals from recalculated lines and tax buckets.
///
/// Unlike the buckets, net and tax totals are summed raw and rounded once.
pub fn compose_totals(lines: &[PricedLine], buckets: &[TaxBucket]) -> Totals {
    let net_total = round_half_up(lines.iter().map(|l| l.line_amount).sum::<Decimal>());
    let vat_total = round_half_up(buckets.iter().map(|b| b.tax_amount).sum::<Decimal>());
    let gross_total = round_half_up(net_total + vat_total);

    Totals {
        net_total,
        vat_total,
        gross_total,
        amount_due: gross_total,
    }
}
