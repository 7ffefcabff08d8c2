//! Solve-activity heatmap aggregation for CodeTrack
//!
//! This crate turns a list of solve timestamps into the daily grid a
//! calendar heatmap renders: one cell per day over a trailing window,
//! positioned by week-of-year column and Monday-first weekday row.
//!
//! Timestamps are bucketed by their **UTC calendar date**, regardless of the
//! server's local timezone, so the same ledger always produces the same grid.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Days, NaiveDate, Utc};
use serde::Serialize;

/// Length of the trailing activity window, ending today.
pub const WINDOW_DAYS: u64 = 365;

/// One day cell of the heatmap grid.
///
/// `week` is the column (week of year) and `weekday` the row (0 = Monday,
/// 6 = Sunday). Days with no solves are present with `count` 0, so the grid
/// is always contiguous.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapPoint {
    pub date: NaiveDate,
    pub week: u32,
    pub weekday: u32,
    pub count: u32,
}

/// Build the daily solve-count grid for the `window_days` ending at `today`.
///
/// Each timestamp contributes to the cell of its UTC calendar date; dates
/// outside the window are dropped. The week column is the ISO week number,
/// with one correction: early-January dates that ISO assigns to the final
/// week of the previous year (week > 50) are forced to column 0, so the
/// year-boundary week renders as a single contiguous column instead of
/// wrapping to the far end of the grid.
pub fn build_heatmap(
    solve_times: &[DateTime<Utc>],
    window_days: u64,
    today: NaiveDate,
) -> Vec<HeatmapPoint> {
    let mut counts: HashMap<NaiveDate, u32> = HashMap::new();
    for solved_at in solve_times {
        *counts.entry(solved_at.date_naive()).or_insert(0) += 1;
    }

    let Some(start) = today.checked_sub_days(Days::new(window_days.saturating_sub(1))) else {
        return Vec::new();
    };

    start
        .iter_days()
        .take_while(|date| *date <= today)
        .map(|date| HeatmapPoint {
            date,
            week: week_column(date),
            weekday: date.weekday().num_days_from_monday(),
            count: counts.get(&date).copied().unwrap_or(0),
        })
        .collect()
}

/// ISO week number with the year-boundary wraparound correction.
fn week_column(date: NaiveDate) -> u32 {
    let week = date.iso_week().week();
    if date.month() == 1 && week > 50 { 0 } else { week }
}
