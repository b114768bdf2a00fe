use chrono::NaiveDate;
use thiserror::Error;
use tracing::{instrument, trace};

use super::{Entry, Log, Week};

/// Line separating two week stanzas.
pub const STANZA_SEPARATOR: &str = "%%";

const DATE_HEADER: &str = "Date";
const DATE_FORMATS: [&str; 3] = ["%B %d, %Y", "%b %d, %Y", "%b %d %Y"];

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing required 'Date' header:\n{0}")]
    MissingDate(String),
    #[error("duplicate 'Date' header:\n{0}")]
    DuplicateDate(String),
    #[error("could not parse date {0:?}, expected a date like 'January 2, 2006'")]
    InvalidDate(String),
    #[error("malformed header line {0:?}, expected 'Key: value'")]
    MalformedHeader(String),
    #[error("malformed 'k=v' label: {0:?}")]
    MalformedLabel(String),
}

/// Parses a whole log file. Stanzas are separated by a `%%` line, blank stanzas are skipped.
#[instrument(skip(record_jar))]
pub fn parse_log(record_jar: &str) -> Result<Log, ParseError> {
    let mut log = vec![];
    let mut stanza = String::new();
    for line in record_jar.lines() {
        if line.trim() == STANZA_SEPARATOR {
            push_stanza(&mut log, &stanza)?;
            stanza.clear();
        } else {
            stanza.push_str(line);
            stanza.push('\n');
        }
    }
    push_stanza(&mut log, &stanza)?;
    trace!("Parsed {} weeks", log.len());
    Ok(log)
}

fn push_stanza(log: &mut Log, stanza: &str) -> Result<(), ParseError> {
    if !stanza.trim().is_empty() {
        log.push(parse_week(stanza)?);
    }
    Ok(())
}

/// Parses a single stanza: `Key: value` header lines, a blank line, then one entry per line.
pub fn parse_week(stanza: &str) -> Result<Week, ParseError> {
    let mut lines = stanza.lines().skip_while(|line| line.trim().is_empty());

    let mut headers: Vec<(String, String)> = vec![];
    for line in lines.by_ref() {
        if line.trim().is_empty() {
            break;
        }
        // Indented lines continue the previous header value
        if line.starts_with([' ', '\t']) {
            let Some((_, value)) = headers.last_mut() else {
                return Err(ParseError::MalformedHeader(line.to_string()));
            };
            value.push(' ');
            value.push_str(line.trim());
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            return Err(ParseError::MalformedHeader(line.to_string()));
        };
        let key = key.trim();
        if key.is_empty() || key.contains(char::is_whitespace) {
            return Err(ParseError::MalformedHeader(line.to_string()));
        }
        headers.push((key.to_string(), value.trim().to_string()));
    }

    let mut dates = headers
        .iter()
        .filter(|(key, _)| key == DATE_HEADER)
        .map(|(_, value)| value);
    let date = match (dates.next(), dates.next()) {
        (None, _) => return Err(ParseError::MissingDate(stanza.to_string())),
        (Some(_), Some(_)) => return Err(ParseError::DuplicateDate(stanza.to_string())),
        (Some(date), None) => parse_date(date)?,
    };

    let mut week = Week::new(date);
    for (key, value) in headers {
        if key != DATE_HEADER {
            week.header.entry(key).or_default().push(value);
        }
    }

    for line in lines {
        let line = dewhite(line);
        if line.is_empty() {
            continue;
        }
        let (entry, done) = parse_entry(&line)?;
        if done {
            week.done.push(entry);
        } else {
            week.todo.push(entry);
        }
    }
    Ok(week)
}

pub fn parse_date(s: &str) -> Result<NaiveDate, ParseError> {
    let s = dewhite(s);
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(&s, format).ok())
        .ok_or(ParseError::InvalidDate(s))
}

/// Parses an entry line. Returns the entry and whether it was done.
pub fn parse_entry(line: &str) -> Result<(Entry, bool), ParseError> {
    let line = dewhite(line);
    let (done, line) = split_marker(&line);
    let Some(cut) = line.rfind("##") else {
        return Ok((Entry::new(line), done));
    };
    let labels = parse_labels(&line[cut + 2..])?;
    Ok((
        Entry {
            line: dewhite(&line[..cut]),
            labels,
        },
        done,
    ))
}

fn split_marker(line: &str) -> (bool, &str) {
    if let Some(rest) = line.strip_prefix("[ ]") {
        (false, rest.trim())
    } else if let Some(rest) = line.strip_prefix("[x]") {
        (true, rest.trim())
    } else if let Some(rest) = line.strip_prefix('#').filter(|rest| !rest.starts_with('#')) {
        (false, rest.trim())
    } else {
        (true, line)
    }
}

fn parse_labels(s: &str) -> Result<std::collections::BTreeMap<String, String>, ParseError> {
    s.split_whitespace()
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if !key.is_empty() && !value.contains('=') => {
                Ok((key.to_string(), value.to_string()))
            }
            _ => Err(ParseError::MalformedLabel(pair.to_string())),
        })
        .collect()
}

/// Collapses runs of whitespace into single spaces and trims the ends.
fn dewhite(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
