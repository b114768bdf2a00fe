use std::fmt::Write;

use super::{parse::STANZA_SEPARATOR, Entry, Log, Week};
use crate::utils::time::format_week_date;

const TODO_MARKER: &str = "# ";
const DONE_MARKER: &str = "[x] ";

/// Reformats a log into its canonical form, newest week first.
pub fn print_log(log: &Log) -> String {
    let mut weeks = log.iter().collect::<Vec<_>>();
    weeks.sort_by(|a, b| b.date.cmp(&a.date));
    weeks
        .into_iter()
        .map(print_week)
        .collect::<Vec<_>>()
        .join(&format!("{STANZA_SEPARATOR}\n"))
}

fn print_week(week: &Week) -> String {
    let mut out = format!("Date: {}\n", format_week_date(week.date));
    for (key, values) in &week.header {
        for value in values {
            let _ = writeln!(out, "{key}: {value}");
        }
    }
    out.push('\n');

    let width = week
        .done
        .iter()
        .map(|entry| entry.line.chars().count() + done_marker(entry).len())
        .chain(
            week.todo
                .iter()
                .map(|entry| entry.line.chars().count() + TODO_MARKER.len()),
        )
        .max()
        .unwrap_or(0);

    for entry in &week.done {
        out += &print_entry(done_marker(entry), entry, width);
    }
    for entry in &week.todo {
        out += &print_entry(TODO_MARKER, entry, width);
    }
    out.push('\n');
    out
}

/// Done entries only need a marker when their text would read back as a todo.
fn done_marker(entry: &Entry) -> &'static str {
    let line = entry.line.as_str();
    let todo_like = (line.starts_with('#') && !line.starts_with("##"))
        || line.starts_with("[ ]")
        || line.starts_with("[x]");
    if todo_like {
        DONE_MARKER
    } else {
        ""
    }
}

fn print_entry(marker: &str, entry: &Entry, width: usize) -> String {
    let line = format!("{marker}{}", entry.line);
    if entry.labels.is_empty() {
        return format!("{line}\n");
    }
    let labels = entry
        .labels
        .iter()
        .map(|(key, value)| format!(" {key}={value}"))
        .collect::<String>();
    let pad = width.saturating_sub(line.chars().count());
    format!("{line}{}  ##{labels}\n", " ".repeat(pad))
}
