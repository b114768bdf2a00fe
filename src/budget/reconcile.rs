use chrono::Duration;
use tracing::trace;

use super::{BudgetError, ResolvedBudget, Result};
use crate::{
    log::{Entry, FUZZY_LABEL, STRICT_LABEL},
    utils::duration::{as_nanos_f64, format_duration, parse_duration, scale_duration},
};

/// Time allotted to a single entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryTime<'a> {
    pub entry: &'a Entry,
    /// Share of the whole budget.
    pub relative: f64,
    pub strict: Duration,
    pub fuzzy: Duration,
}

impl EntryTime<'_> {
    pub fn duration(&self) -> Duration {
        self.strict + self.fuzzy
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation<'a> {
    pub entries: Vec<EntryTime<'a>>,
    /// Ratio of the last scaling step, 0 when nothing was scaled.
    pub ratio: f64,
}

/// Fits declared entry times into `absolute`.
///
/// Strict time is protected: it is only scaled, together with fuzzy time, when strict time alone
/// doesn't fit into the budget or when there is no fuzzy time to absorb the difference. After
/// that fuzzy time is stretched or squeezed so that the entries fill the budget exactly.
pub fn reconcile<'a>(
    budget: &ResolvedBudget,
    relative: f64,
    absolute: Duration,
    entries: &[&'a Entry],
) -> Result<Reconciliation<'a>> {
    let mut times = entries
        .iter()
        .map(|entry| declared_time(budget, entry))
        .collect::<Result<Vec<_>>>()?;

    if times.is_empty() {
        return Ok(Reconciliation {
            entries: times,
            ratio: 0.,
        });
    }

    let mut ratio = 0.;
    let (mut strict_total, mut fuzzy_total) = sum_times(&times);
    trace!(
        "Fitting {} strict and {} fuzzy time into {}",
        format_duration(strict_total),
        format_duration(fuzzy_total),
        format_duration(absolute)
    );

    if strict_total >= absolute || fuzzy_total.is_zero() {
        let declared = strict_total + fuzzy_total;
        ratio = if declared.is_zero() {
            0.
        } else {
            as_nanos_f64(absolute) / as_nanos_f64(declared)
        };
        trace!("Scaling strict and fuzzy time by {ratio}");
        for time in times.iter_mut() {
            time.strict = scale_duration(time.strict, ratio);
            time.fuzzy = scale_duration(time.fuzzy, ratio);
        }
        (strict_total, fuzzy_total) = sum_times(&times);
    }

    if !fuzzy_total.is_zero() {
        ratio = as_nanos_f64(absolute - strict_total) / as_nanos_f64(fuzzy_total);
        trace!("Scaling fuzzy time by {ratio}");
        for time in times.iter_mut() {
            time.fuzzy = scale_duration(time.fuzzy, ratio);
        }
    }

    let absolute_nanos = as_nanos_f64(absolute);
    for time in times.iter_mut() {
        time.relative = if absolute.is_zero() {
            0.
        } else {
            relative * as_nanos_f64(time.duration()) / absolute_nanos
        };
    }

    Ok(Reconciliation {
        entries: times,
        ratio,
    })
}

/// Time as written in the entry labels. Entries without any time get the default fuzzy time.
fn declared_time<'a>(budget: &ResolvedBudget, entry: &'a Entry) -> Result<EntryTime<'a>> {
    let strict = label_duration(entry, STRICT_LABEL)?;
    let fuzzy = label_duration(entry, FUZZY_LABEL)?;
    let fuzzy = match (strict, fuzzy) {
        (None, None) => Some(budget.default_fuzzy),
        (_, fuzzy) => fuzzy,
    };
    Ok(EntryTime {
        entry,
        relative: 0.,
        strict: strict.unwrap_or_else(Duration::zero),
        fuzzy: fuzzy.unwrap_or_else(Duration::zero),
    })
}

fn label_duration(entry: &Entry, key: &str) -> Result<Option<Duration>> {
    entry
        .label(key)
        .map(|value| {
            parse_duration(value).ok_or_else(|| BudgetError::MalformedDuration {
                key: key.to_string(),
                value: value.to_string(),
            })
        })
        .transpose()
}

fn sum_times(times: &[EntryTime]) -> (Duration, Duration) {
    times.iter().fold(
        (Duration::zero(), Duration::zero()),
        |(strict, fuzzy), time| (strict + time.strict, fuzzy + time.fuzzy),
    )
}
