// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use chrono::TimeZone;
use serde::Serialize;

use crate::app::App;
use crate::models::{Transaction, TxType};
use crate::money::AmountInput;
use crate::utils::{maybe_print_json, parse_date, parse_month, pretty_table, required};

pub fn handle<Tz>(app: &mut App<Tz>, m: &clap::ArgMatches) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match m.subcommand() {
        Some(("add", sub)) => add(app, sub)?,
        Some(("list", sub)) => {
            app.prepare_display();
            list(app, sub)?
        }
        Some(("rm", sub)) => remove(app, sub)?,
        _ => {}
    }
    Ok(())
}

fn add<Tz: TimeZone>(app: &mut App<Tz>, sub: &clap::ArgMatches) -> Result<()> {
    let mut amount = AmountInput::new(required(sub, "amount")?.as_str());
    amount.blur();
    let tx_type: TxType = required(sub, "type")?.parse()?;
    let description = sub.get_one::<String>("description").map(String::as_str).unwrap_or("");
    let category = sub.get_one::<String>("category").map(String::as_str);

    let tx = app
        .add_transaction(&amount, description, category, tx_type)
        .context("Transaction was not saved")?;
    app.prepare_display();
    println!(
        "Recorded {} {} ({}) #{}",
        tx.tx_type,
        app.format_amount(tx.amount),
        tx.category,
        tx.id
    );
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TransactionRow {
    pub id: i64,
    pub created_at: String,
    #[serde(rename = "type")]
    pub tx_type: TxType,
    pub category: String,
    pub description: String,
    pub amount: String,
}

/// Rows for `tx list`: an explicit `--date`/`--month` wins, then the
/// persisted selected day unless `--all`.
pub fn query_rows<Tz>(app: &App<Tz>, sub: &clap::ArgMatches) -> Result<Vec<TransactionRow>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let ledger = app.ledger();
    let all = app.transactions();
    let mut picked: Vec<&Transaction> = if let Some(d) = sub.get_one::<String>("date") {
        ledger.day_view(all, Some(parse_date(d)?))
    } else if let Some(mo) = sub.get_one::<String>("month") {
        let month = parse_month(mo)?;
        let mut rows = ledger.bucketer().transactions_in_month(all, month);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        rows
    } else if sub.get_flag("all") {
        ledger.day_view(all, None)
    } else {
        app.visible_transactions()
    };
    if let Some(limit) = sub.get_one::<usize>("limit") {
        picked.truncate(*limit);
    }

    let tz = ledger.bucketer().timezone();
    Ok(picked
        .into_iter()
        .map(|t| TransactionRow {
            id: t.id,
            created_at: t.created_at.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string(),
            tx_type: t.tx_type,
            category: t.category.clone(),
            description: t.description.clone(),
            amount: app.format_amount(t.amount),
        })
        .collect())
}

fn list<Tz>(app: &App<Tz>, sub: &clap::ArgMatches) -> Result<()>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(app, sub)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        if let Some(day) = app.prefs().selected_date {
            if sub.get_one::<String>("date").is_none()
                && sub.get_one::<String>("month").is_none()
                && !sub.get_flag("all")
            {
                println!("Showing {} only (pocketledger cal clear to reset)", day);
            }
        }
        let rows: Vec<Vec<String>> = data
            .into_iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.created_at,
                    r.tx_type.to_string(),
                    r.category,
                    r.description,
                    r.amount,
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["ID", "When", "Type", "Category", "Description", "Amount"],
                rows,
            )
        );
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn remove<Tz: TimeZone>(app: &mut App<Tz>, sub: &clap::ArgMatches) -> Result<()> {
    let id = *sub
        .get_one::<i64>("id")
        .context("missing required argument 'id'")?;
    if !sub.get_flag("yes") {
        app.prepare_display();
        let what = match app.transactions().iter().find(|t| t.id == id) {
            Some(t) => format!(
                "Delete #{} {} {} ({})?",
                id,
                t.tx_type,
                app.format_amount(t.amount),
                t.category
            ),
            None => format!("Delete #{}?", id),
        };
        if !confirm(&what)? {
            println!("Kept #{}", id);
            return Ok(());
        }
    }
    app.delete_transaction(id)
        .with_context(|| format!("Transaction #{} was not deleted", id))?;
    println!("Deleted #{}", id);
    Ok(())
}
