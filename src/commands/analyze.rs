// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use chrono::TimeZone;

use crate::app::App;
use crate::calendar::month_label;
use crate::commands::reports::month_ref;

/// Failures are printed inline; the command itself still succeeds.
pub fn handle<Tz: TimeZone>(app: &App<Tz>, m: &clap::ArgMatches) -> Result<()> {
    let reference = month_ref(m)?;
    println!("Analyzing {}...", month_label(reference));
    match app.analyze_month(reference) {
        Ok(text) => println!("{}", text),
        Err(e) => println!("Analysis unavailable: {}", e),
    }
    Ok(())
}
