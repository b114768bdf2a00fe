use std::collections::{BTreeMap, BTreeSet};

use ansi_term::{Colour, Style};

use super::ViewConfig;
use crate::{
    budget::{entities::Total, focus::focus},
    utils::{duration::as_nanos_f64, time::format_week_date},
};

const COLORS: [Colour; 6] = [
    Colour::Red,
    Colour::Green,
    Colour::Yellow,
    Colour::Blue,
    Colour::Purple,
    Colour::Cyan,
];
const MISSING_COLOR: Colour = Colour::Fixed(8);
const MISSING_VALUE: &str = "?";
const NANOS_PER_HOUR: f64 = 3_600_000_000_000.;

/// Renders one bar per total. Every distinct top level value gets a segment as wide as its share
/// of the budget. With a focus group the bars show the focused value's children, followed by a
/// second bar with the focused value's share of the whole budget.
pub fn print_totals(view: &ViewConfig, totals: &[Total], hours_per_day: u32) -> String {
    let focused = view.focus_group().map(|value| (value, focus(totals, value)));
    let shown = focused.as_ref().map_or(totals, |(_, focused)| focused.as_slice());

    let values = shown
        .iter()
        .flat_map(|total| total.sub_totals.iter().map(|v| v.value.as_str()))
        .collect::<BTreeSet<_>>();

    let mut screen_width = view.screen_width() as f64;
    if focused.is_some() {
        screen_width /= 2.;
    }

    let mut out = String::new();
    for (total, top) in shown.iter().zip(totals) {
        out += &print_total(total, &values, screen_width, hours_per_day);
        if let Some((value, _)) = &focused {
            out += &print_focus_share(top, value, screen_width);
        }
        out.push('\n');
    }
    out
}

fn print_total(
    total: &Total,
    values: &BTreeSet<&str>,
    screen_width: f64,
    hours_per_day: u32,
) -> String {
    let widths = total
        .sub_totals
        .iter()
        .map(|v| (v.value.as_str(), v.relative * screen_width))
        .collect::<BTreeMap<_, _>>();

    let mut out = format!(" {}   |", format_week_date(total.date));
    let mut cursor = 0f64;
    let mut color = 0;
    for value in values {
        let width = widths.get(value).copied().unwrap_or(0.);
        let chars = (cursor + width).round() as usize - cursor.round() as usize;
        cursor += width;

        let (style, value) = if value.is_empty() {
            (MISSING_COLOR.normal(), MISSING_VALUE)
        } else {
            color += 1;
            (COLORS[(color - 1) % COLORS.len()].normal(), *value)
        };
        out += &style.paint(segment(value, chars)).to_string();
        out.push('|');
    }

    let days = as_nanos_f64(total.absolute) / NANOS_PER_HOUR / hours_per_day.max(1) as f64;
    out += &format!("  ({days:.1}d) ");
    out
}

/// Value centered in a run of dashes, cut to fit into `chars`.
fn segment(value: &str, chars: usize) -> String {
    let value = value.chars().take(chars).collect::<String>();
    let pad = chars - value.chars().count();
    format!(
        "{}{value}{}",
        "-".repeat(pad / 2),
        "-".repeat(pad / 2 + pad % 2)
    )
}

fn print_focus_share(top: &Total, value: &str, screen_width: f64) -> String {
    let width = top
        .sub_totals
        .iter()
        .find(|v| v.value == value)
        .map_or(0, |v| (v.relative * screen_width).round() as usize);
    let rest = (screen_width as usize).saturating_sub(width);
    format!(
        " |{}|{}|",
        Style::new().bold().paint("-".repeat(width)),
        " ".repeat(rest)
    )
}
