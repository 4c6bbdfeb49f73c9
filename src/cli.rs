// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, crate_version, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .conflicts_with("json")
            .help("Print as JSON lines"),
    )
}

fn currency_opt() -> Arg {
    Arg::new("currency")
        .long("currency")
        .help("Display currency (IDR|USD|EUR); defaults to the settings value")
}

pub fn build_cli() -> Command {
    Command::new("dompet")
        .version(crate_version!())
        .about("Local-first expense tracker with multi-currency display and offline caching")
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the local database"))
        .subcommand(
            Command::new("tx")
                .about("Transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction")
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(Arg::new("description").long("description").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(
                            Arg::new("type")
                                .long("type")
                                .default_value("expense")
                                .help("income|expense"),
                        )
                        .arg(Arg::new("currency").long("currency").help("IDR|USD|EUR; defaults to the settings value"))
                        .arg(Arg::new("date").long("date").help("YYYY-MM-DD, defaults to now")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List transactions, newest first")
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        )
                        .arg(Arg::new("type").long("type").help("income|expense"))
                        .arg(Arg::new("category").long("category"))
                        .arg(currency_opt()),
                ))
                .subcommand(
                    Command::new("rm")
                        .about("Delete one or more transactions by id")
                        .arg(Arg::new("ids").required(true).num_args(1..)),
                )
                .subcommand(
                    Command::new("clear")
                        .about("Delete every transaction")
                        .arg(
                            Arg::new("yes")
                                .long("yes")
                                .action(ArgAction::SetTrue)
                                .help("Confirm"),
                        ),
                ),
        )
        .subcommand(
            Command::new("draft")
                .about("The saved, not yet submitted transaction form")
                .subcommand(Command::new("show"))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("amount").long("amount"))
                        .arg(Arg::new("description").long("description"))
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("date").long("date")),
                )
                .subcommand(Command::new("clear"))
                .subcommand(Command::new("commit").about("Validate the draft and save it")),
        )
        .subcommand(
            Command::new("settings")
                .about("User settings")
                .subcommand(json_flags(Command::new("show")))
                .subcommand(
                    Command::new("set")
                        .arg(Arg::new("currency").long("currency"))
                        .arg(Arg::new("language").long("language").help("en|id"))
                        .arg(Arg::new("theme").long("theme").help("light|dark"))
                        .arg(Arg::new("username").long("username"))
                        .arg(Arg::new("avatar").long("avatar").help("Path to a PNG/JPEG/GIF/WebP image"))
                        .arg(
                            Arg::new("clear-avatar")
                                .long("clear-avatar")
                                .action(ArgAction::SetTrue)
                                .conflicts_with("avatar"),
                        ),
                ),
        )
        .subcommand(
            Command::new("rates")
                .about("Exchange rates")
                .subcommand(json_flags(
                    Command::new("show").arg(Arg::new("base").long("base")),
                ))
                .subcommand(
                    Command::new("convert")
                        .arg(Arg::new("amount").required(true))
                        .arg(Arg::new("from").required(true))
                        .arg(Arg::new("to").required(true)),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Balances and breakdowns in the display currency")
                .subcommand(json_flags(Command::new("summary").arg(currency_opt())))
                .subcommand(json_flags(Command::new("by-category").arg(currency_opt()))),
        )
        .subcommand(
            Command::new("insight")
                .about("AI spending summary")
                .subcommand(
                    Command::new("generate").arg(
                        Arg::new("save")
                            .long("save")
                            .action(ArgAction::SetTrue)
                            .help("Keep the result in saved insights"),
                    ),
                )
                .subcommand(Command::new("list"))
                .subcommand(
                    Command::new("rm").arg(
                        Arg::new("index")
                            .required(true)
                            .value_parser(value_parser!(usize)),
                    ),
                ),
        )
        .subcommand(
            Command::new("offline")
                .about("Offline cache of the app shell")
                .subcommand(Command::new("install").about("Cache the shell assets and activate"))
                .subcommand(Command::new("activate").about("Drop caches from older versions"))
                .subcommand(
                    Command::new("fetch")
                        .about("Fetch a URL through the offline cache")
                        .arg(Arg::new("url").required(true))
                        .arg(
                            Arg::new("navigate")
                                .long("navigate")
                                .action(ArgAction::SetTrue)
                                .help("Treat as a page load"),
                        )
                        .arg(Arg::new("method").long("method").default_value("GET"))
                        .arg(Arg::new("out").long("out").help("Write the body to this file")),
                )
                .subcommand(Command::new("status")),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(
            Command::new("privacy")
                .about("Hide amounts in output")
                .subcommand(Command::new("on"))
                .subcommand(Command::new("off"))
                .subcommand(Command::new("status")),
        )
        .subcommand(
            Command::new("session")
                .about("Session-scoped state")
                .subcommand(Command::new("end").about("Forget session data such as cached rates")),
        )
}
