use std::collections::BTreeMap;

use chrono::Duration;
use tracing::{instrument, trace};

use super::{entities::SubTotal, reconcile::reconcile, ResolvedBudget, Result};
use crate::log::Entry;

/// Splits entries by the label at `depth` of the label grouping and recurses into every bucket
/// with the bucket's share of the budget. Buckets are ordered by value, entries without the label
/// end up in a bucket with an empty value.
///
/// Returns the sub totals and the ratio that was used to fit `entries` into `absolute`.
#[instrument(level = "trace", skip(budget, entries), fields(entries = entries.len()))]
pub fn group(
    budget: &ResolvedBudget,
    depth: usize,
    relative: f64,
    absolute: Duration,
    entries: &[&Entry],
) -> Result<(Vec<SubTotal>, f64)> {
    let Some(label) = budget.label_grouping.get(depth) else {
        return Ok((vec![], 0.));
    };

    let reconciliation = reconcile(budget, relative, absolute, entries)?;

    let mut buckets = BTreeMap::<&str, (SubTotal, Vec<&Entry>)>::new();
    for time in reconciliation.entries {
        let value = time.entry.label(label).unwrap_or("");
        let (sub_total, bucket) = buckets
            .entry(value)
            .or_insert_with(|| (SubTotal::new(label, value), vec![]));
        sub_total.relative += time.relative;
        sub_total.absolute += time.duration();
        sub_total.count += 1;
        bucket.push(time.entry);
    }
    trace!("{} buckets for label {label}", buckets.len());

    let sub_totals = buckets
        .into_values()
        .map(|(mut sub_total, bucket)| {
            let (children, _) = group(
                budget,
                depth + 1,
                sub_total.relative,
                sub_total.absolute,
                &bucket,
            )?;
            sub_total.sub_totals = children;
            Ok(sub_total)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((sub_totals, reconciliation.ratio))
}
