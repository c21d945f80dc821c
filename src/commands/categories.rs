// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::app::App;
use crate::categories::PanelState;
use crate::utils::{pretty_table, required};
use anyhow::Result;
use chrono::TimeZone;

pub fn handle<Tz: TimeZone>(app: &mut App<Tz>, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = required(sub, "name")?;
            if app.prefs_mut().add_category(name)? {
                println!("Added category '{}'", name.trim());
            } else {
                println!("Category '{}' is blank or already exists", name);
            }
        }
        Some(("list", sub)) => {
            let panel = if sub.get_flag("expand") {
                PanelState::Collapsed.toggle()
            } else {
                PanelState::Collapsed
            };
            let categories = &app.prefs().categories;
            match panel {
                PanelState::Collapsed => println!(
                    "{} categories, default '{}' (--expand to show all)",
                    categories.len(),
                    categories.first()
                ),
                PanelState::Expanded => {
                    let data = categories.iter().map(|c| vec![c.to_string()]).collect();
                    println!("{}", pretty_table(&["Category"], data));
                }
            }
        }
        Some(("rm", sub)) => {
            let name = required(sub, "name")?;
            match app.prefs_mut().remove_category(name)? {
                Ok(true) => println!(
                    "Removed category '{}'; default is now '{}'",
                    name,
                    app.prefs().categories.first()
                ),
                Ok(false) => println!("No category named '{}'", name),
                Err(e) => println!("Cannot remove '{}': {}", name, e),
            }
        }
        _ => {}
    }
    Ok(())
}
