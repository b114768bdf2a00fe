//! Budget aggregation. Entries of every week are fitted into a fixed weekly time budget, grouped
//! into a hierarchy of labels and optionally merged into longer periods.

pub mod entities;
pub mod focus;
pub mod grouping;
pub mod merge;
pub mod reconcile;

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use entities::{Period, Total};
use grouping::group;
use merge::merge_totals;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::{log::Week, utils::time::truncate_to_window};

pub const DEFAULT_DAYS_PER_WEEK: u32 = 5;
pub const DEFAULT_HOURS_PER_DAY: u32 = 8;
pub const DEFAULT_FUZZY_MINUTES: u32 = 30;
pub const DEFAULT_LABEL_GROUPING: [&str; 2] = ["cat", "sub"];

#[derive(Error, Debug, PartialEq)]
pub enum BudgetError {
    #[error("malformed duration {value:?} in label {key:?}")]
    MalformedDuration { key: String, value: String },
    #[error("weekly budget of {days_per_week} days of {hours_per_day} hours is too large")]
    BudgetOverflow {
        days_per_week: u32,
        hours_per_day: u32,
    },
    #[error("nothing to merge")]
    EmptyMerge,
    #[error("can't merge sub totals of different labels {expected:?} and {found:?}")]
    LabelMismatch { expected: String, found: String },
    #[error("can't merge sub totals of different values {expected:?} and {found:?}")]
    ValueMismatch { expected: String, found: String },
}

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Budget settings as they are written in the config file. Every field is optional, see
/// [BudgetConfig::resolve] for defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct BudgetConfig {
    pub aggregation_period: Option<Period>,
    pub days_per_week: Option<u32>,
    pub hours_per_day: Option<u32>,
    pub default_fuzzy_minutes: Option<u32>,
    pub label_grouping: Option<Vec<String>>,
}

impl BudgetConfig {
    pub fn resolve(&self) -> ResolvedBudget {
        ResolvedBudget {
            period: self.aggregation_period.unwrap_or(Period::Weekly),
            days_per_week: self.days_per_week.unwrap_or(DEFAULT_DAYS_PER_WEEK),
            hours_per_day: self.hours_per_day.unwrap_or(DEFAULT_HOURS_PER_DAY),
            default_fuzzy: Duration::minutes(
                self.default_fuzzy_minutes.unwrap_or(DEFAULT_FUZZY_MINUTES) as i64,
            ),
            label_grouping: self.label_grouping.clone().unwrap_or_else(|| {
                DEFAULT_LABEL_GROUPING.iter().map(|v| v.to_string()).collect()
            }),
        }
    }
}

/// [BudgetConfig] with defaults filled in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBudget {
    pub period: Period,
    pub days_per_week: u32,
    pub hours_per_day: u32,
    pub default_fuzzy: Duration,
    pub label_grouping: Vec<String>,
}

impl Default for ResolvedBudget {
    fn default() -> Self {
        BudgetConfig::default().resolve()
    }
}

impl ResolvedBudget {
    pub fn weekly_budget(&self) -> Result<Duration> {
        (self.days_per_week as i64)
            .checked_mul(self.hours_per_day as i64)
            .and_then(Duration::try_hours)
            .ok_or(BudgetError::BudgetOverflow {
                days_per_week: self.days_per_week,
                hours_per_day: self.hours_per_day,
            })
    }
}

/// Computes totals for every week and merges them into the configured period.
#[instrument(skip_all, fields(weeks = weeks.len()))]
pub fn aggregate(config: &BudgetConfig, weeks: &[Week]) -> Result<Vec<Total>> {
    let budget = config.resolve();

    let totals = weeks
        .iter()
        .map(|week| get_total(&budget, week))
        .collect::<Result<Vec<_>>>()?;

    if budget.period == Period::Weekly {
        return Ok(totals);
    }

    let mut periods = BTreeMap::<NaiveDate, Vec<Total>>::new();
    for total in totals {
        periods
            .entry(truncate_to_window(total.date, budget.period.window_days()))
            .or_default()
            .push(total);
    }
    debug!("Merging into {} {} periods", periods.len(), budget.period);

    periods
        .into_iter()
        .map(|(date, totals)| merge_totals(&totals, date, budget.period))
        .collect()
}

/// Total of a single week. Todo entries are not part of the budget.
#[instrument(skip_all, fields(date = %week.date))]
pub fn get_total(budget: &ResolvedBudget, week: &Week) -> Result<Total> {
    let absolute = budget.weekly_budget()?;
    let entries = week.done.iter().collect::<Vec<_>>();
    let (sub_totals, ratio) = group(budget, 0, 1., absolute, &entries)?;
    debug!("Week fitted with ratio {ratio}");
    Ok(Total {
        date: week.date,
        period: Period::Weekly,
        absolute,
        sub_totals,
        ratio,
    })
}

#[cfg(test)]
pub(crate) mod test_utils {
    use chrono::Duration;

    use super::entities::{SubTotal, Total};

    pub const EPSILON: f64 = 1e-9;

    pub fn assert_close(got: f64, want: f64) {
        assert!((got - want).abs() < EPSILON, "got {got}, want {want}");
    }

    /// Checks that children shares and durations add up to their parent at every level.
    pub fn assert_conserved(total: &Total) {
        let absolute = total
            .sub_totals
            .iter()
            .fold(Duration::zero(), |ac, v| ac + v.absolute);
        assert!((absolute - total.absolute).num_nanoseconds().unwrap().abs() <= 64);
        if !total.sub_totals.is_empty() {
            assert_close(total.sub_totals.iter().map(|v| v.relative).sum(), 1.);
        }
        total.sub_totals.iter().for_each(assert_sub_conserved);
    }

    fn assert_sub_conserved(sub: &SubTotal) {
        if sub.sub_totals.is_empty() {
            return;
        }
        let absolute = sub
            .sub_totals
            .iter()
            .fold(Duration::zero(), |ac, v| ac + v.absolute);
        assert!((absolute - sub.absolute).num_nanoseconds().unwrap().abs() <= 64);
        assert_close(sub.sub_totals.iter().map(|v| v.relative).sum(), sub.relative);
        assert_eq!(sub.sub_totals.iter().map(|v| v.count).sum::<usize>(), sub.count);
        sub.sub_totals.iter().for_each(assert_sub_conserved);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{
        aggregate,
        entities::{Period, SubTotal},
        get_total,
        test_utils::{assert_close, assert_conserved},
        BudgetConfig, BudgetError, ResolvedBudget,
    };
    use crate::{
        log::{Entry, Week},
        utils::logging::TEST_LOGGING,
    };

    fn labelled(cat: &str, sub: &str) -> Entry {
        Entry::new(format!("{cat} {sub}"))
            .with_label("cat", cat)
            .with_label("sub", sub)
    }

    fn sample_week(date: NaiveDate) -> Week {
        Week::new(date)
            .with_done(labelled("a", "1"))
            .with_done(labelled("a", "1"))
            .with_done(labelled("a", "2"))
            .with_done(labelled("b", "2"))
            .with_todo(Entry::new("ignored").with_label("cat", "c"))
    }

    fn assert_sub(sub: &SubTotal, value: &str, relative: f64, hours: i64, count: usize) {
        assert_eq!(sub.value, value);
        assert_close(sub.relative, relative);
        assert_eq!(sub.absolute, Duration::hours(hours));
        assert_eq!(sub.count, count);
    }

    #[test]
    fn test_resolve_defaults() {
        let budget = BudgetConfig::default().resolve();
        assert_eq!(budget.period, Period::Weekly);
        assert_eq!(budget.weekly_budget(), Ok(Duration::hours(40)));
        assert_eq!(budget.default_fuzzy, Duration::minutes(30));
        assert_eq!(budget.label_grouping, vec!["cat", "sub"]);

        let budget = BudgetConfig {
            days_per_week: Some(4),
            hours_per_day: Some(6),
            label_grouping: Some(vec!["project".into()]),
            ..Default::default()
        }
        .resolve();
        assert_eq!(budget.weekly_budget(), Ok(Duration::hours(24)));
        assert_eq!(budget.label_grouping, vec!["project"]);
    }

    #[test]
    fn test_config_deserializes_pascal_case() {
        let config: BudgetConfig = serde_json::from_str(
            r#"{"AggregationPeriod": "Monthly", "DefaultFuzzyMinutes": 60, "LabelGrouping": ["x"]}"#,
        )
        .unwrap();
        assert_eq!(config.aggregation_period, Some(Period::Monthly));
        assert_eq!(config.default_fuzzy_minutes, Some(60));
        assert_eq!(config.days_per_week, None);
        assert_eq!(config.label_grouping, Some(vec!["x".to_string()]));
    }

    #[test]
    fn test_get_total_even_expansion() {
        *TEST_LOGGING;

        let date = NaiveDate::from_ymd_opt(2021, 1, 11).unwrap();
        let total = get_total(&ResolvedBudget::default(), &sample_week(date)).unwrap();

        assert_eq!(total.date, date);
        assert_eq!(total.period, Period::Weekly);
        assert_eq!(total.absolute, Duration::hours(40));
        assert_close(total.ratio, 20.);
        assert_eq!(total.sub_totals.len(), 2);

        let a = &total.sub_totals[0];
        assert_sub(a, "a", 0.75, 30, 3);
        assert_eq!(a.label, "cat");
        assert_eq!(a.sub_totals.len(), 2);
        assert_sub(&a.sub_totals[0], "1", 0.5, 20, 2);
        assert_sub(&a.sub_totals[1], "2", 0.25, 10, 1);
        assert_eq!(a.sub_totals[0].label, "sub");
        assert!(a.sub_totals[0].sub_totals.is_empty());

        let b = &total.sub_totals[1];
        assert_sub(b, "b", 0.25, 10, 1);
        assert_eq!(b.sub_totals.len(), 1);
        assert_sub(&b.sub_totals[0], "2", 0.25, 10, 1);

        assert_conserved(&total);
    }

    #[test]
    fn test_get_total_empty_week() {
        let date = NaiveDate::from_ymd_opt(2021, 1, 11).unwrap();
        let total = get_total(&ResolvedBudget::default(), &Week::new(date)).unwrap();
        assert_eq!(total.absolute, Duration::hours(40));
        assert!(total.sub_totals.is_empty());
        assert_eq!(total.ratio, 0.);
    }

    #[test]
    fn test_get_total_malformed_duration() {
        let week = Week::new(NaiveDate::from_ymd_opt(2021, 1, 11).unwrap())
            .with_done(labelled("a", "1"))
            .with_done(labelled("a", "1").with_label("t", "soon"));
        assert_eq!(
            get_total(&ResolvedBudget::default(), &week),
            Err(BudgetError::MalformedDuration {
                key: "t".into(),
                value: "soon".into()
            })
        );
    }

    #[test]
    fn test_oversized_budget_is_an_error() {
        let config = BudgetConfig {
            days_per_week: Some(u32::MAX),
            hours_per_day: Some(u32::MAX),
            ..Default::default()
        };
        let overflow = Err(BudgetError::BudgetOverflow {
            days_per_week: u32::MAX,
            hours_per_day: u32::MAX,
        });
        assert_eq!(config.resolve().weekly_budget(), overflow);

        let weeks = [sample_week(NaiveDate::from_ymd_opt(2021, 1, 11).unwrap())];
        assert!(matches!(
            aggregate(&config, &weeks),
            Err(BudgetError::BudgetOverflow { .. })
        ));
    }

    #[test]
    fn test_aggregate_weekly_keeps_weeks() {
        let weeks = [
            sample_week(NaiveDate::from_ymd_opt(2021, 1, 11).unwrap()),
            sample_week(NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()),
        ];
        let totals = aggregate(&BudgetConfig::default(), &weeks).unwrap();
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].date, weeks[0].date);
        assert_eq!(totals[1].date, weeks[1].date);
        assert!(totals.iter().all(|v| v.period == Period::Weekly));
    }

    #[test]
    fn test_aggregate_monthly_merges_windows() {
        *TEST_LOGGING;

        // 2021-01-04 and 2021-01-11 share a 30 day window, 2021-03-01 falls into another one.
        let first = NaiveDate::from_ymd_opt(2021, 1, 4).unwrap();
        let second = NaiveDate::from_ymd_opt(2021, 1, 11).unwrap();
        let third = NaiveDate::from_ymd_opt(2021, 3, 1).unwrap();
        let weeks = [
            sample_week(second),
            Week::new(third).with_done(labelled("b", "1")),
            sample_week(first),
        ];
        let config = BudgetConfig {
            aggregation_period: Some(Period::Monthly),
            ..Default::default()
        };

        let totals = aggregate(&config, &weeks).unwrap();

        assert_eq!(totals.len(), 2);
        // 30 day windows counted from 0001-01-01
        assert_eq!(totals[0].date, NaiveDate::from_ymd_opt(2021, 1, 1).unwrap());
        assert_eq!(totals[1].date, NaiveDate::from_ymd_opt(2021, 1, 31).unwrap());
        assert!(totals.iter().all(|v| v.period == Period::Monthly));
        assert!(totals.iter().all(|v| v.ratio == 0.));

        let merged = &totals[0];
        assert_eq!(merged.absolute, Duration::hours(80));
        assert_sub(&merged.sub_totals[0], "a", 0.75, 60, 6);
        assert_sub(&merged.sub_totals[1], "b", 0.25, 20, 2);
        assert_conserved(merged);

        let single = &totals[1];
        assert_eq!(single.absolute, Duration::hours(40));
        assert_sub(&single.sub_totals[0], "b", 1., 40, 1);
    }

    #[test]
    fn test_aggregate_quarterly() {
        let weeks = [
            sample_week(NaiveDate::from_ymd_opt(2021, 1, 4).unwrap()),
            sample_week(NaiveDate::from_ymd_opt(2021, 1, 11).unwrap()),
            sample_week(NaiveDate::from_ymd_opt(2021, 1, 18).unwrap()),
        ];
        let config = BudgetConfig {
            aggregation_period: Some(Period::Quarterly),
            ..Default::default()
        };
        let totals = aggregate(&config, &weeks).unwrap();
        let count: usize = totals
            .iter()
            .flat_map(|v| v.sub_totals.iter())
            .map(|v| v.count)
            .sum();
        assert_eq!(count, 12);
        let absolute = totals
            .iter()
            .fold(Duration::zero(), |ac, v| ac + v.absolute);
        assert_eq!(absolute, Duration::hours(120));
    }
}
