// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Month and week grids for the calendar views, plus month navigation.
//!
//! Weeks start on Sunday. A month grid is always six full weeks.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

pub const GRID_CELLS: usize = 42;
pub const WEEK_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub in_month: bool,
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let first = first_of_month(date);
    // Day 32 after the 1st always falls in the following month.
    let next_first = first_of_month(first + Duration::days(31));
    (next_first - first).num_days() as u32
}

fn with_clamped_day(first: NaiveDate, day: u32) -> NaiveDate {
    let day = day.min(days_in_month(first));
    first + Duration::days(i64::from(day - 1))
}

/// Same day-of-month one month earlier, clamped to the target month's length
/// (Mar 31 → Feb 28/29).
pub fn previous_month(reference: NaiveDate) -> NaiveDate {
    let last_of_prev = first_of_month(reference) - Duration::days(1);
    with_clamped_day(first_of_month(last_of_prev), reference.day())
}

pub fn next_month(reference: NaiveDate) -> NaiveDate {
    let next_first = first_of_month(first_of_month(reference) + Duration::days(31));
    with_clamped_day(next_first, reference.day())
}

/// Sunday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_sunday()))
}

/// The 6×7 grid for `reference`'s month, Sunday-first, padded with real dates
/// from the neighbouring months.
pub fn month_grid(reference: NaiveDate) -> Vec<CalendarCell> {
    let first = first_of_month(reference);
    let leading = first.weekday().num_days_from_sunday() as usize;
    let in_month = days_in_month(first) as usize;
    let trailing = GRID_CELLS - (leading + in_month);

    let start = first - Duration::days(leading as i64);
    start
        .iter_days()
        .take(leading + in_month + trailing)
        .enumerate()
        .map(|(i, date)| CalendarCell {
            date,
            in_month: (leading..leading + in_month).contains(&i),
        })
        .collect()
}

/// Sunday..Saturday of the week containing `reference`.
pub fn week_grid(reference: NaiveDate) -> Vec<NaiveDate> {
    week_start(reference).iter_days().take(WEEK_DAYS).collect()
}

pub fn month_label(date: NaiveDate) -> String {
    date.format("%B %Y").to_string()
}
