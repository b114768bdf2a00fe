use chrono::Duration;
use tracing::{instrument, trace};

use super::entities::{SubTotal, Total};

/// Zooms every total into the top level sub total with `value`. Its children become the new top
/// level and their shares are renormalized to sum up to 1. Totals without the value end up empty.
#[instrument(skip(totals), fields(totals = totals.len()))]
pub fn focus(totals: &[Total], value: &str) -> Vec<Total> {
    totals
        .iter()
        .map(|total| focus_total(total, value))
        .collect()
}

fn focus_total(total: &Total, value: &str) -> Total {
    let Some(focused) = total.sub_totals.iter().find(|v| v.value == value) else {
        trace!("{} has no {value:?}", total.date);
        return Total {
            absolute: Duration::zero(),
            sub_totals: vec![],
            ..total.clone()
        };
    };

    let sub_totals = focused
        .sub_totals
        .iter()
        .cloned()
        .map(|child| child.rescaled(focused.relative))
        .collect::<Vec<SubTotal>>();
    let absolute = sub_totals
        .iter()
        .fold(Duration::zero(), |ac, v| ac + v.absolute);

    Total {
        absolute,
        sub_totals,
        ..total.clone()
    }
}
