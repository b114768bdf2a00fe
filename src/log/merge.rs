use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::{Log, Week};

/// Combines weeks sharing a date, regardless of which log they came from. Header values are
/// unioned, entries are concatenated in the order the logs were given. The result is sorted by
/// date.
pub fn merge_logs(logs: impl IntoIterator<Item = Log>) -> Log {
    let mut weeks = BTreeMap::<NaiveDate, Week>::new();
    for week in logs.into_iter().flatten() {
        match weeks.remove(&week.date) {
            Some(previous) => weeks.insert(week.date, merge_weeks(previous, week)),
            None => weeks.insert(week.date, week),
        };
    }
    weeks.into_values().collect()
}

fn merge_weeks(mut a: Week, b: Week) -> Week {
    for (key, values) in b.header {
        let merged = a.header.entry(key).or_default();
        for value in values {
            if !merged.contains(&value) {
                merged.push(value);
            }
        }
    }
    a.done.extend(b.done);
    a.todo.extend(b.todo);
    a
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::merge_logs;
    use crate::log::{Entry, Week};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 1, day).unwrap()
    }

    #[test]
    fn test_merge_logs_by_date() {
        let mut a = Week::new(date(11)).with_done(Entry::new("a1"));
        a.header.insert("Focus".into(), vec!["x".into(), "y".into()]);
        let mut b = Week::new(date(11))
            .with_done(Entry::new("b1"))
            .with_todo(Entry::new("b2"));
        b.header.insert("Focus".into(), vec!["y".into(), "z".into()]);
        b.header.insert("Mood".into(), vec!["good".into()]);
        let c = Week::new(date(4)).with_done(Entry::new("c1"));

        let merged = merge_logs([vec![a], vec![b, c]]);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].date, date(4));
        assert_eq!(merged[1].date, date(11));
        assert_eq!(
            merged[1].done,
            vec![Entry::new("a1"), Entry::new("b1")]
        );
        assert_eq!(merged[1].todo, vec![Entry::new("b2")]);
        assert_eq!(
            merged[1].header.get("Focus").unwrap(),
            &vec!["x".to_string(), "y".to_string(), "z".to_string()]
        );
        assert_eq!(
            merged[1].header.get("Mood").unwrap(),
            &vec!["good".to_string()]
        );
    }

    #[test]
    fn test_merge_single_log_collapses_duplicates() {
        let log = vec![
            Week::new(date(4)).with_done(Entry::new("one")),
            Week::new(date(4)).with_done(Entry::new("two")),
        ];
        let merged = merge_logs([log]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].done.len(), 2);
    }
}
