// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print one JSON object per line"),
    )
}

fn date_arg(help: &'static str) -> Arg {
    Arg::new("date").long("date").value_name("YYYY-MM-DD").help(help)
}

fn month_arg() -> Arg {
    Arg::new("month")
        .long("month")
        .value_name("YYYY-MM")
        .help("Month to report on (default: current month)")
}

pub fn build_cli() -> Command {
    Command::new("pocketledger")
        .about("Household income/expense ledger with calendar views")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("tx")
                .about("Record, list and delete transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record an income or expense")
                        .arg(
                            Arg::new("amount")
                                .long("amount")
                                .required(true)
                                .allow_hyphen_values(true)
                                .help("Amount in KRW; rounded to the nearest 10"),
                        )
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .value_parser(["income", "expense"]),
                        )
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("description").long("description").default_value("")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(date_arg("Only this day (overrides the selected day)"))
                        .arg(month_arg().conflicts_with("date"))
                        .arg(
                            Arg::new("all")
                                .long("all")
                                .action(ArgAction::SetTrue)
                                .help("Ignore the selected day"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete a transaction")
                        .arg(
                            Arg::new("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .short('y')
                                .action(ArgAction::SetTrue)
                                .help("Skip the confirmation prompt"),
                        ),
                ),
        )
        .subcommand(
            Command::new("cal")
                .about("Calendar views")
                .subcommand(
                    Command::new("month")
                        .about("Six-week month grid with daily nets")
                        .arg(date_arg("Any day in the month (default: today)"))
                        .arg(
                            Arg::new("prev")
                                .long("prev")
                                .action(ArgAction::SetTrue)
                                .help("Show the month before"),
                        )
                        .arg(
                            Arg::new("next")
                                .long("next")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("prev")
                                .help("Show the month after"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("week")
                        .about("Sunday..Saturday week containing the date")
                        .arg(date_arg("Any day in the week (default: today)")),
                ))
                .subcommand(
                    Command::new("select")
                        .about("Select a day; selecting it again clears the selection")
                        .arg(Arg::new("date").required(true).value_name("YYYY-MM-DD")),
                )
                .subcommand(Command::new("clear").about("Clear the selected day")),
        )
        .subcommand(json_flags(
            Command::new("summary").about("All-time income, expense and balance"),
        ))
        .subcommand(
            Command::new("report").about("Reports").subcommand(json_flags(
                Command::new("month")
                    .about("Monthly totals compared with the previous month")
                    .arg(month_arg())
                    .arg(
                        Arg::new("chart")
                            .long("chart")
                            .action(ArgAction::SetTrue)
                            .help("Draw the daily running balance"),
                    ),
            )),
        )
        .subcommand(
            Command::new("category")
                .about("Manage categories")
                .subcommand(
                    Command::new("list").arg(
                        Arg::new("expand")
                            .long("expand")
                            .action(ArgAction::SetTrue)
                            .help("Show every category instead of the count"),
                    ),
                )
                .subcommand(Command::new("add").arg(Arg::new("name").required(true)))
                .subcommand(Command::new("rm").arg(Arg::new("name").required(true))),
        )
        .subcommand(
            Command::new("fx")
                .about("Display currency and exchange rate")
                .subcommand(Command::new("show").about("Show the current USD→KRW rate"))
                .subcommand(
                    Command::new("currency")
                        .about("Set the display currency")
                        .arg(
                            Arg::new("currency")
                                .required(true)
                                .value_parser(["KRW", "USD", "krw", "usd"]),
                        ),
                )
                .subcommand(
                    Command::new("watch")
                        .about("Refresh the rate on a fixed interval")
                        .arg(
                            Arg::new("interval-secs")
                                .long("interval-secs")
                                .value_parser(value_parser!(u64))
                                .default_value("3600"),
                        )
                        .arg(
                            Arg::new("count")
                                .long("count")
                                .value_parser(value_parser!(usize))
                                .help("Stop after this many refreshes"),
                        ),
                ),
        )
        .subcommand(
            Command::new("analyze")
                .about("Ask the analysis service to comment on a month")
                .arg(month_arg()),
        )
        .subcommand(
            Command::new("export")
                .about("Export all transactions")
                .arg(
                    Arg::new("format")
                        .long("format")
                        .default_value("csv")
                        .value_parser(["csv", "json"]),
                )
                .arg(Arg::new("out").long("out").required(true)),
        )
}
