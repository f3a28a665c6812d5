use tracing::debug;

use super::aggregate::{TaxBucket, aggregate_taxes};
use super::draft::Draft;
use super::error::NormalizeError;
use super::recalc::{PricedLine, recalculate_lines};
use super::totals::compose_totals;
use super::types::Totals;

/// The draft merged with everything the core recomputed.
///
/// Recalculated values replace whatever the LLM supplied for line amounts,
/// the VAT breakdown and the totals. The raw draft is kept for the fields
/// the core does not compute (parties, dates, payment, ...), which
/// [`bind`](super::bind) interprets later.
#[derive(Debug, Clone)]
pub struct StagedInvoice {
    draft: Draft,
    lines: Vec<PricedLine>,
    vat_breakdown: Option<Vec<TaxBucket>>,
    totals: Totals,
}

impl StagedInvoice {
    /// Run recalculation, aggregation and the totals composer on `draft`.
    pub fn stage(draft: Draft) -> Result<Self, NormalizeError> {
        let lines = recalculate_lines(draft.line_items())?;
        let buckets = aggregate_taxes(&lines);
        let totals = compose_totals(&lines, &buckets);

        debug!(
            lines = lines.len(),
            buckets = buckets.len(),
            net = %totals.net_total,
            tax = %totals.vat_total,
            "staged draft"
        );

        Ok(Self {
            draft,
            lines,
            vat_breakdown: (!buckets.is_empty()).then_some(buckets),
            totals,
        })
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn lines(&self) -> &[PricedLine] {
        &self.lines
    }

    /// `None` when there were no lines to aggregate.
    pub fn vat_breakdown(&self) -> Option<&[TaxBucket]> {
        self.vat_breakdown.as_deref()
    }

    pub fn totals(&self) -> &Totals {
        &self.totals
    }

    pub(crate) fn into_parts(self) -> (Draft, Vec<PricedLine>, Option<Vec<TaxBucket>>, Totals) {
        (self.draft, self.lines, self.vat_breakdown, self.totals)
    }
}
