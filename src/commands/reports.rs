// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::{Local, NaiveDate, TimeZone};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::app::App;
use crate::bucket::Totals;
use crate::calendar::month_label;
use crate::chart::ChartPoint;
use crate::ledger::{CategoryTotal, MonthComparison, TOP_CATEGORY_COUNT};
use crate::utils::{maybe_print_json, parse_month, pretty_table};

pub fn summary<Tz: TimeZone>(app: &mut App<Tz>, m: &clap::ArgMatches) -> Result<()> {
    app.prepare_display();
    let totals = app.ledger().summary(app.transactions());
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &totals)? {
        println!("{}", totals_table(app, &totals));
    }
    Ok(())
}

pub fn handle<Tz: TimeZone>(app: &mut App<Tz>, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("month", sub)) = m.subcommand() {
        app.prepare_display();
        month(app, sub)?;
    }
    Ok(())
}

fn totals_table<Tz: TimeZone>(app: &App<Tz>, t: &Totals) -> comfy_table::Table {
    pretty_table(
        &["Income", "Expense", "Balance"],
        vec![vec![
            app.format_amount(t.income),
            app.format_amount(t.expense),
            app.format_amount(t.balance),
        ]],
    )
}

fn pct(p: Option<Decimal>) -> String {
    match p {
        Some(v) if v > Decimal::ZERO => format!("+{}%", v),
        Some(v) => format!("{}%", v),
        None => "n/a".into(),
    }
}

fn signed<Tz: TimeZone>(app: &App<Tz>, v: Decimal) -> String {
    if v > Decimal::ZERO {
        format!("+{}", app.format_amount(v))
    } else {
        app.format_amount(v)
    }
}

#[derive(Serialize)]
struct MonthReport {
    #[serde(flatten)]
    comparison: MonthComparison,
    top_categories: Vec<CategoryTotal>,
}

pub fn month_ref(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match sub.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => Ok(Local::now().date_naive()),
    }
}

fn month<Tz: TimeZone>(app: &App<Tz>, sub: &clap::ArgMatches) -> Result<()> {
    let reference = month_ref(sub)?;
    let all = app.transactions();
    let report = MonthReport {
        comparison: app.ledger().month_comparison(all, reference),
        top_categories: app.ledger().top_categories(all, reference, TOP_CATEGORY_COUNT),
    };
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &report)? {
        return Ok(());
    }

    let c = &report.comparison;
    println!("{}", month_label(reference));
    let rows = vec![
        vec![
            "Income".to_string(),
            app.format_amount(c.current.income),
            app.format_amount(c.previous.income),
            signed(app, c.delta.income_delta),
            pct(c.delta.income_delta_pct),
        ],
        vec![
            "Expense".to_string(),
            app.format_amount(c.current.expense),
            app.format_amount(c.previous.expense),
            signed(app, c.delta.expense_delta),
            pct(c.delta.expense_delta_pct),
        ],
        vec![
            "Balance".to_string(),
            app.format_amount(c.current.balance),
            app.format_amount(c.previous.balance),
            signed(app, c.delta.balance_delta),
            String::new(),
        ],
    ];
    println!(
        "{}",
        pretty_table(&["", "This month", "Last month", "Change", "%"], rows)
    );

    if !report.top_categories.is_empty() {
        let rows = report
            .top_categories
            .iter()
            .map(|t| vec![t.category.clone(), app.format_amount(t.amount)])
            .collect();
        println!("{}", pretty_table(&["Top category", "Spent"], rows));
    }

    if sub.get_flag("chart") {
        let points: Vec<ChartPoint> = app
            .ledger()
            .daily_balance_series(all, reference)
            .into_iter()
            .map(|(d, v)| ChartPoint {
                label: d.format("%d").to_string(),
                value: v,
            })
            .collect();
        if let Some(text) = app.chart().render(&points) {
            println!("Running balance (KRW)");
            print!("{}", text);
        }
    }
    Ok(())
}
