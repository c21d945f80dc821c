// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use pocketledger::app::App;
use pocketledger::config::Config;
use pocketledger::{cli, commands, db, utils};

fn main() -> Result<()> {
    utils::init_tracing();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let config = Config::from_env()?;
    let mut app = App::from_config(&config)?;

    if let Some(("init", _)) = matches.subcommand() {
        let path = match &config.db_path {
            Some(p) => p.clone(),
            None => db::db_path()?,
        };
        println!("Database initialized at {}", path.display());
        return Ok(());
    }

    let needs_rows = !matches!(
        matches.subcommand_name(),
        Some("category") | Some("fx") | None
    );
    if needs_rows {
        app.load().context("Could not load transactions")?;
    }

    match matches.subcommand() {
        Some(("tx", sub)) => commands::transactions::handle(&mut app, sub)?,
        Some(("cal", sub)) => commands::calendar::handle(&mut app, sub)?,
        Some(("summary", sub)) => commands::reports::summary(&mut app, sub)?,
        Some(("report", sub)) => commands::reports::handle(&mut app, sub)?,
        Some(("category", sub)) => commands::categories::handle(&mut app, sub)?,
        Some(("fx", sub)) => commands::fx::handle(&mut app, sub)?,
        Some(("analyze", sub)) => commands::analyze::handle(&app, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&app, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
