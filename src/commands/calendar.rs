// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Local, NaiveDate, TimeZone};
use comfy_table::{presets::UTF8_FULL, Cell, Table};

use crate::app::App;
use crate::bucket::DaySummary;
use crate::calendar::{WEEK_DAYS, month_label, next_month, previous_month};
use crate::utils::{maybe_print_json, parse_date, pretty_table, required};

const WEEKDAY_HEADERS: [&str; WEEK_DAYS] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub fn handle<Tz: TimeZone>(app: &mut App<Tz>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("month", sub)) => {
            app.prepare_display();
            month(app, sub)?
        }
        Some(("week", sub)) => {
            app.prepare_display();
            week(app, sub)?
        }
        Some(("select", sub)) => {
            let date = parse_date(required(sub, "date")?)?;
            match app.click_date(date)? {
                Some(d) => println!("Selected {}", d),
                None => println!("Selection cleared"),
            }
        }
        Some(("clear", _)) => {
            app.clear_selection()?;
            println!("Selection cleared");
        }
        _ => {}
    }
    Ok(())
}

fn reference_date(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("date") {
        Some(s) => parse_date(s),
        None => Ok(Local::now().date_naive()),
    }
}

/// `cal month` reference day: `--date` (or today), shifted by `--prev`/`--next`.
pub fn month_reference(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    let date = reference_date(sub)?;
    Ok(if sub.get_flag("prev") {
        previous_month(date)
    } else if sub.get_flag("next") {
        next_month(date)
    } else {
        date
    })
}

/// Day number, then the net and entry counts when the day has activity.
fn cell_text<Tz: TimeZone>(app: &App<Tz>, s: &DaySummary, in_month: bool, selected: bool) -> String {
    let day = s.date.format("%d").to_string();
    let mut text = match (in_month, selected) {
        (_, true) => format!("*{}*", day),
        (false, false) => format!("({})", day),
        (true, false) => day,
    };
    if !s.is_empty() {
        text.push_str(&format!(
            "\n{}\n+{} -{}",
            app.format_amount(s.net()),
            s.counts.income_count,
            s.counts.expense_count
        ));
    }
    text
}

fn month<Tz: TimeZone>(app: &App<Tz>, sub: &clap::ArgMatches) -> Result<()> {
    let reference = month_reference(sub)?;
    let days = app.ledger().calendar_month(app.transactions(), reference);
    let selected = app.prefs().selected_date;

    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(WEEKDAY_HEADERS.iter().map(|h| Cell::new(*h)));
    for week in days.chunks(WEEK_DAYS) {
        t.add_row(week.iter().map(|d| {
            Cell::new(cell_text(
                app,
                &d.summary,
                d.cell.in_month,
                selected == Some(d.cell.date),
            ))
        }));
    }
    let totals = app.ledger().monthly_summary(app.transactions(), reference);
    println!("{}", month_label(reference));
    println!("{}", t);
    println!(
        "Income {}  Expense {}  Balance {}",
        app.format_amount(totals.income),
        app.format_amount(totals.expense),
        app.format_amount(totals.balance)
    );
    Ok(())
}

fn week<Tz: TimeZone>(app: &App<Tz>, sub: &clap::ArgMatches) -> Result<()> {
    let reference = reference_date(sub)?;
    let view = app.ledger().calendar_week(app.transactions(), reference);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &view)? {
        return Ok(());
    }
    let selected = app.prefs().selected_date;
    let rows: Vec<Vec<String>> = view
        .days
        .iter()
        .zip(WEEKDAY_HEADERS)
        .map(|(d, wd)| {
            let marker = if selected == Some(d.date) { "*" } else { "" };
            vec![
                format!("{}{} {}", marker, wd, d.date),
                app.format_amount(d.totals.income),
                app.format_amount(d.totals.expense),
                app.format_amount(d.net()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["Day", "Income", "Expense", "Net"], rows)
    );
    println!(
        "Week total: income {}  expense {}  net {}",
        app.format_amount(view.totals.income),
        app.format_amount(view.totals.expense),
        app.format_amount(view.totals.balance)
    );
    Ok(())
}
