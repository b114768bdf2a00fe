use std::fmt::Write;

use crate::{log::Log, utils::time::format_week_date};

/// Lists the open entries of every week, oldest week first. Weeks without todos are skipped.
pub fn print_todo(log: &Log) -> String {
    let mut weeks = log.iter().filter(|v| !v.todo.is_empty()).collect::<Vec<_>>();
    weeks.sort_by_key(|v| v.date);

    let mut out = String::new();
    for week in weeks {
        let _ = writeln!(out, "{}", format_week_date(week.date));
        for entry in &week.todo {
            let _ = writeln!(out, "[ ] {}", entry.line);
        }
    }
    out
}
