// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use dompet::{cli, commands, config::Config, db};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = cli::build_cli();
    let matches = cli.get_matches();

    let cfg = Config::from_env()?;
    let conn = db::open_or_init(&cfg)?;

    match matches.subcommand() {
        Some(("init", _)) => {
            println!("Database initialized at {}", db::db_path(&cfg)?.display());
        }
        Some(("tx", sub)) => commands::transactions::handle(&conn, &cfg, sub)?,
        Some(("draft", sub)) => commands::draft::handle(&conn, sub)?,
        Some(("settings", sub)) => commands::settings::handle(&conn, sub)?,
        Some(("rates", sub)) => commands::rates::handle(&conn, &cfg, sub)?,
        Some(("report", sub)) => commands::reports::handle(&conn, &cfg, sub)?,
        Some(("insight", sub)) => commands::insight::handle(&conn, &cfg, sub)?,
        Some(("offline", sub)) => commands::offline::handle(&conn, &cfg, sub)?,
        Some(("export", sub)) => commands::exporter::handle(&conn, sub)?,
        Some(("privacy", sub)) => commands::privacy::handle(&conn, sub)?,
        Some(("session", sub)) => commands::session::handle(&conn, sub)?,
        _ => {
            cli::build_cli().print_help()?;
            println!();
        }
    }
    Ok(())
}
