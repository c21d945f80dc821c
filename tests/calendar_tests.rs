// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use pocketledger::calendar::{
    GRID_CELLS, days_in_month, month_grid, month_label, next_month, previous_month, week_grid,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn month_grid_shape_holds_for_every_month() {
    for y in 2020..=2030 {
        for m in 1..=12 {
            let first = d(y, m, 1);
            let grid = month_grid(d(y, m, 15));
            assert_eq!(grid.len(), GRID_CELLS, "{}-{}", y, m);
            assert_eq!(grid[0].date.weekday(), Weekday::Sun);
            for pair in grid.windows(2) {
                assert_eq!(pair[1].date - pair[0].date, Duration::days(1));
            }
            let idx = first.weekday().num_days_from_sunday() as usize;
            assert_eq!(grid[idx].date, first);
            assert_eq!(
                grid.iter().filter(|c| c.in_month).count() as u32,
                days_in_month(first)
            );
            assert!(grid.iter().filter(|c| c.in_month).all(|c| c.date.month() == m));
        }
    }
}

#[test]
fn month_grid_rolls_across_year_boundaries() {
    // 2025-01-01 is a Wednesday
    let jan = month_grid(d(2025, 1, 10));
    assert_eq!(jan[0].date, d(2024, 12, 29));
    assert!(!jan[0].in_month);
    assert_eq!(jan[3].date, d(2025, 1, 1));
    assert!(jan[3].in_month);

    let dec = month_grid(d(2024, 12, 1));
    let last = dec.last().unwrap();
    assert_eq!(last.date.year(), 2025);
    assert!(!last.in_month);
}

#[test]
fn week_grid_starts_on_sunday() {
    let week = week_grid(d(2024, 3, 13));
    assert_eq!(week.len(), 7);
    assert_eq!(week[0], d(2024, 3, 10));
    assert_eq!(week[6], d(2024, 3, 16));
    assert!(week.windows(2).all(|w| w[0] < w[1]));

    let sunday = week_grid(d(2024, 3, 10));
    assert_eq!(sunday[0], d(2024, 3, 10));

    let across = week_grid(d(2025, 1, 1));
    assert_eq!(across[0], d(2024, 12, 29));
    assert_eq!(across[6], d(2025, 1, 4));
}

#[test]
fn previous_month_clamps_day_and_rolls_year() {
    assert_eq!(previous_month(d(2024, 3, 1)), d(2024, 2, 1));
    assert_eq!(previous_month(d(2024, 3, 31)), d(2024, 2, 29));
    assert_eq!(previous_month(d(2023, 3, 31)), d(2023, 2, 28));
    assert_eq!(previous_month(d(2024, 1, 31)), d(2023, 12, 31));
    assert_eq!(previous_month(d(2024, 5, 31)), d(2024, 4, 30));
}

#[test]
fn next_month_never_skips_a_month() {
    assert_eq!(next_month(d(2024, 1, 31)), d(2024, 2, 29));
    assert_eq!(next_month(d(2023, 1, 31)), d(2023, 2, 28));
    assert_eq!(next_month(d(2024, 12, 15)), d(2025, 1, 15));
}

#[test]
fn days_in_month_and_label() {
    assert_eq!(days_in_month(d(2024, 2, 10)), 29);
    assert_eq!(days_in_month(d(2023, 2, 10)), 28);
    assert_eq!(days_in_month(d(2024, 12, 31)), 31);
    assert_eq!(days_in_month(d(2024, 4, 1)), 30);
    assert_eq!(month_label(d(2024, 3, 5)), "March 2024");
}
