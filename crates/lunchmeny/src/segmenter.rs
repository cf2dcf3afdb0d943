use crate::finder::MenuError;
use crate::text::{contains_ci, find_ci};
use crate::types::{Weekday, WeekdayLabel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySegment<'a> {
    pub weekday: Weekday,
    pub label: &'a str,
    pub raw: &'a str,
}

pub fn missing_label<'d>(text: &str, days: &'d [WeekdayLabel]) -> Option<&'d WeekdayLabel> {
    days.iter().find(|day| !contains_ci(text, &day.label))
}

/// Splits `text` into one segment per day.
///
/// Fails with [`MenuError::IncompleteWeek`] unless every label occurs in the
/// text. Each day is bounded by the first occurrence of the following day's
/// label; the last day gets at most `last_day_lines` lines. Every search starts
/// from the top of the text, so pages that repeat weekday names can produce
/// overlapping segments.
pub fn segment_week<'a>(
    text: &'a str,
    days: &'a [WeekdayLabel],
    last_day_lines: usize,
) -> Result<Vec<DaySegment<'a>>, MenuError> {
    if let Some(day) = missing_label(text, days) {
        return Err(MenuError::IncompleteWeek {
            missing: day.label.clone(),
        });
    }

    let segments = days
        .iter()
        .enumerate()
        .filter_map(|(i, day)| {
            let start = find_ci(text, &day.label)?.start;
            let raw = match days.get(i + 1) {
                Some(next) => {
                    let end = find_ci(text, &next.label)?.start;
                    text.get(start..end)?
                }
                None => take_lines(&text[start..], last_day_lines),
            };
            Some(DaySegment {
                weekday: day.weekday,
                label: &day.label,
                raw,
            })
        })
        .collect();

    Ok(segments)
}

fn take_lines(text: &str, n: usize) -> &str {
    match text.match_indices('\n').nth(n.saturating_sub(1)) {
        Some((idx, _)) if n > 0 => &text[..idx],
        Some(_) => "",
        None if n == 0 => "",
        None => text,
    }
}
