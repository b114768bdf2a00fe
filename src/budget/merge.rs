use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use tracing::{instrument, trace};

use super::{
    entities::{Period, SubTotal, Total},
    BudgetError, Result,
};

/// Merges totals of several periods into a single total dated `date`. Absolute time and counts
/// are summed, relative shares are averaged over the number of merged totals so that they keep
/// summing up to 1.
#[instrument(skip(totals), fields(totals = totals.len()))]
pub fn merge_totals(totals: &[Total], date: NaiveDate, period: Period) -> Result<Total> {
    if totals.is_empty() {
        return Err(BudgetError::EmptyMerge);
    }

    let absolute = totals
        .iter()
        .fold(Duration::zero(), |ac, total| ac + total.absolute);
    let children = totals
        .iter()
        .flat_map(|total| total.sub_totals.iter())
        .collect::<Vec<_>>();

    Ok(Total {
        date,
        period,
        absolute,
        sub_totals: merge_by_value(&children, totals.len())?,
        ratio: 0.,
    })
}

/// Groups sub totals sharing a value and merges every group. Output is ordered by value.
/// All sub totals have to share one label.
pub fn merge_by_value(sub_totals: &[&SubTotal], n: usize) -> Result<Vec<SubTotal>> {
    if let Some(first) = sub_totals.first() {
        if let Some(other) = sub_totals.iter().find(|v| v.label != first.label) {
            return Err(BudgetError::LabelMismatch {
                expected: first.label.clone(),
                found: other.label.clone(),
            });
        }
    }

    let mut groups = BTreeMap::<&str, Vec<&SubTotal>>::new();
    for &sub_total in sub_totals {
        groups
            .entry(sub_total.value.as_str())
            .or_default()
            .push(sub_total);
    }
    trace!("Merging {} sub totals into {}", sub_totals.len(), groups.len());

    groups
        .into_values()
        .map(|group| merge_sub_totals(&group, n))
        .collect()
}

/// Merges sub totals describing the same label value. `n` is the number of totals being merged,
/// relative shares are divided by it.
pub fn merge_sub_totals(sub_totals: &[&SubTotal], n: usize) -> Result<SubTotal> {
    let Some(first) = sub_totals.first() else {
        return Err(BudgetError::EmptyMerge);
    };
    if n == 0 {
        return Err(BudgetError::EmptyMerge);
    }

    let mut merged = SubTotal::new(first.label.clone(), first.value.clone());
    for sub_total in sub_totals {
        if sub_total.label != first.label {
            return Err(BudgetError::LabelMismatch {
                expected: first.label.clone(),
                found: sub_total.label.clone(),
            });
        }
        if sub_total.value != first.value {
            return Err(BudgetError::ValueMismatch {
                expected: first.value.clone(),
                found: sub_total.value.clone(),
            });
        }
        merged.relative += sub_total.relative;
        merged.absolute += sub_total.absolute;
        merged.count += sub_total.count;
    }
    merged.relative /= n as f64;

    let children = sub_totals
        .iter()
        .flat_map(|sub_total| sub_total.sub_totals.iter())
        .collect::<Vec<_>>();
    merged.sub_totals = merge_by_value(&children, n)?;
    Ok(merged)
}
