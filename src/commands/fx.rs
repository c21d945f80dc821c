// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use chrono::TimeZone;
use tracing::info;

use crate::app::App;
use crate::fx::FALLBACK_RATE;
use crate::money::DisplayCurrency;
use crate::utils::{pretty_table, required};

pub fn handle<Tz: TimeZone>(app: &mut App<Tz>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(app),
        Some(("currency", sub)) => {
            let ccy: DisplayCurrency = required(sub, "currency")?.parse()?;
            app.prefs_mut().set_currency(ccy)?;
            println!("Display currency set to {}", ccy);
        }
        Some(("watch", sub)) => {
            let secs = sub.get_one::<u64>("interval-secs").copied().unwrap_or(3600);
            let count = sub.get_one::<usize>("count").copied();
            watch(app, Duration::from_secs(secs), count);
        }
        _ => {}
    }
    Ok(())
}

fn show<Tz: TimeZone>(app: &mut App<Tz>) {
    app.ensure_rate();
    let rates = app.rates();
    let (rate, source) = match rates.cached() {
        Some(r) => (r, "live".to_string()),
        None => (FALLBACK_RATE, "fallback".to_string()),
    };
    let fetched = rates
        .fetched_at()
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".into());
    println!(
        "{}",
        pretty_table(
            &["Pair", "Rate", "Source", "Fetched", "Display"],
            vec![vec![
                "USD/KRW".into(),
                format!("{:.2}", rate),
                source,
                fetched,
                app.prefs().currency.to_string(),
            ]],
        )
    );
}

/// Refresh now and then every `interval`. Runs until `count` refreshes, or forever.
fn watch<Tz: TimeZone>(app: &mut App<Tz>, interval: Duration, count: Option<usize>) {
    let mut done = 0usize;
    loop {
        let rate = app.refresh_rate();
        done += 1;
        info!(rate, "scheduled rate refresh");
        println!(
            "{} USD/KRW {:.2}{}",
            chrono::Utc::now().format("%Y-%m-%d %H:%M:%S"),
            rate,
            if app.rates().cached().is_none() { " (fallback)" } else { "" }
        );
        if count.is_some_and(|c| done >= c) {
            break;
        }
        thread::sleep(interval);
    }
}
