// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, bail};
use chrono::TimeZone;

use crate::app::App;
use crate::models::Transaction;
use crate::utils::required;

pub fn handle<Tz: TimeZone>(app: &App<Tz>, m: &clap::ArgMatches) -> Result<()> {
    let fmt = required(m, "format")?.to_lowercase();
    let out = required(m, "out")?;
    let n = export_transactions(app.transactions(), &fmt, out)?;
    println!("Exported {} transactions to {}", n, out);
    Ok(())
}

/// Oldest first, amounts in KRW.
pub fn export_transactions(txs: &[Transaction], fmt: &str, out: &str) -> Result<usize> {
    let mut rows: Vec<&Transaction> = txs.iter().collect();
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    match fmt {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "id", "created_at", "type", "category", "description", "amount",
            ])?;
            for t in &rows {
                wtr.write_record([
                    t.id.to_string(),
                    t.created_at.to_rfc3339(),
                    t.tx_type.to_string(),
                    t.category.clone(),
                    t.description.clone(),
                    t.amount.to_string(),
                ])?;
            }
            wtr.flush()?;
        }
        "json" => {
            std::fs::write(out, serde_json::to_string_pretty(&rows)?)?;
        }
        other => bail!("Unknown format: {} (use csv|json)", other),
    }
    Ok(rows.len())
}
