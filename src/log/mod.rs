//! Weekly activity log. A log is a sequence of [Week] stanzas, each holding the activities that
//! were done (or are still to do) during that week.

pub mod merge;
pub mod parse;
pub mod tidy;

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Reserved label holding strict time of an entry.
pub const STRICT_LABEL: &str = "t";
/// Reserved label holding fuzzy time of an entry.
pub const FUZZY_LABEL: &str = "f";

pub type Log = Vec<Week>;

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone, Default)]
pub struct Entry {
    pub line: String,
    pub labels: BTreeMap<String, String>,
}

impl Entry {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            line: line.into(),
            labels: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.labels.insert(key.into(), value.into());
        self
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }
}

#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct Week {
    pub date: NaiveDate,
    /// Header values other than `Date`, in the order they were written.
    pub header: BTreeMap<String, Vec<String>>,
    pub done: Vec<Entry>,
    pub todo: Vec<Entry>,
}

impl Week {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            header: BTreeMap::new(),
            done: vec![],
            todo: vec![],
        }
    }

    pub fn with_done(mut self, entry: Entry) -> Self {
        self.done.push(entry);
        self
    }

    pub fn with_todo(mut self, entry: Entry) -> Self {
        self.todo.push(entry);
        self
    }
}
