use std::fmt::Display;

use chrono::{Duration, NaiveDate};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Length of the period a [Total] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
pub enum Period {
    Weekly,
    Monthly,
    Quarterly,
}

impl Period {
    /// Window used when truncating dates. Months and quarters are approximated with fixed
    /// windows, they don't follow the calendar.
    pub fn window_days(&self) -> i32 {
        match self {
            Period::Weekly => 7,
            Period::Monthly => 30,
            Period::Quarterly => 90,
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Period::Weekly => write!(f, "weekly"),
            Period::Monthly => write!(f, "monthly"),
            Period::Quarterly => write!(f, "quarterly"),
        }
    }
}

/// Budget usage over one period.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct Total {
    pub date: NaiveDate,
    pub period: Period,
    /// Whole budget of the period.
    #[serde(with = "duration_ser")]
    pub absolute: Duration,
    pub sub_totals: Vec<SubTotal>,
    /// Compression ratio applied when fitting the week's entries into the budget. Only set for
    /// weekly totals, merged totals carry 0.
    pub ratio: f64,
}

/// Budget usage of one label value. `relative` is the share of the whole budget, so siblings
/// sum up to the share of their parent.
#[derive(PartialEq, Debug, Serialize, Deserialize, Clone)]
pub struct SubTotal {
    pub label: String,
    /// Empty when the entries don't have the label.
    pub value: String,
    pub relative: f64,
    #[serde(with = "duration_ser")]
    pub absolute: Duration,
    pub count: usize,
    pub sub_totals: Vec<SubTotal>,
}

impl SubTotal {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            relative: 0.,
            absolute: Duration::zero(),
            count: 0,
            sub_totals: vec![],
        }
    }

    /// Same subtree with every relative share divided by `share`.
    pub fn rescaled(self, share: f64) -> Self {
        Self {
            relative: if share == 0. { 0. } else { self.relative / share },
            sub_totals: self
                .sub_totals
                .into_iter()
                .map(|v| v.rescaled(share))
                .collect(),
            ..self
        }
    }
}

/// Durations are stored as nanoseconds so that totals survive a round trip unchanged.
mod duration_ser {
    use chrono::Duration;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match duration.num_nanoseconds() {
            Some(nanos) => serializer.serialize_i64(nanos),
            None => Err(serde::ser::Error::custom(format!(
                "duration {duration} doesn't fit into nanoseconds"
            ))),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let nanos = i64::deserialize(deserializer)?;
        Ok(Duration::nanoseconds(nanos))
    }
}
