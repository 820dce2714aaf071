//! Time period matching.
//!
//! A goal's time period is found by exact date range first, then by a display
//! label derived from the export's period text (`Q2 2024` → `Q2 FY24`,
//! `Annual 2023` → `FY23`).

use crate::models::TimePeriod;
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r".*\s(\d+)").unwrap());

static QUARTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(Q\d)\s\d+").unwrap());

/// Derive the workspace display label for an export period.
pub fn derive_period_label(period: &str) -> Option<String> {
    let year = YEAR.captures(period).and_then(|c| c.get(1)).map(|m| m.as_str());
    let quarter = QUARTER
        .captures(period)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str());

    let year = year?;
    let short_year = last_two(year);
    if period.contains("Annual") {
        Some(format!("FY{}", short_year))
    } else {
        quarter.map(|q| format!("{} FY{}", q, short_year))
    }
}

/// Pick the time period for a goal, or `None` to leave it unset.
pub fn resolve_time_period<'a>(
    periods: &'a [TimePeriod],
    start_on: Option<&str>,
    due_on: Option<&str>,
    period: Option<&str>,
) -> Option<&'a TimePeriod> {
    if let (Some(start_on), Some(due_on)) = (start_on, due_on) {
        let by_dates = periods.iter().find(|p| {
            p.start_on.as_deref() == Some(start_on) && p.end_on.as_deref() == Some(due_on)
        });
        if by_dates.is_some() {
            return by_dates;
        }
    }

    debug!("No time period for dates {:?}..{:?}, checking period text", start_on, due_on);
    let label = derive_period_label(period?)?;
    periods
        .iter()
        .find(|p| p.display_name.as_deref() == Some(label.as_str()))
}

fn last_two(year: &str) -> &str {
    let start = year
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &year[start..]
}
