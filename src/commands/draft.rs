// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use rusqlite::Connection;

use super::persistence;
use crate::commands::transactions::submit;
use crate::models::{Currency, TransactionDraft, TxType};
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => show(conn),
        Some(("set", sub)) => set(conn, sub)?,
        Some(("clear", _)) => {
            persistence(conn).clear_draft();
            println!("Draft cleared");
        }
        Some(("commit", _)) => commit(conn)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection) {
    match persistence(conn).get_draft() {
        Some(d) => {
            let rows = vec![
                vec!["amount".into(), d.amount],
                vec!["description".into(), d.description],
                vec!["category".into(), d.category],
                vec!["type".into(), d.r#type.as_str().into()],
                vec!["currency".into(), d.currency.to_string()],
                vec!["date".into(), d.date.unwrap_or_default()],
            ];
            println!("{}", pretty_table(&["Field", "Value"], rows));
        }
        None => println!("No draft saved"),
    }
}

/// Merge the given fields into the saved draft.
pub fn apply_fields(mut draft: TransactionDraft, sub: &clap::ArgMatches) -> Result<TransactionDraft> {
    if let Some(v) = sub.get_one::<String>("amount") {
        draft.amount = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("description") {
        draft.description = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("category") {
        draft.category = v.clone();
    }
    if let Some(v) = sub.get_one::<String>("type") {
        draft.r#type = v.parse::<TxType>()?;
    }
    if let Some(v) = sub.get_one::<String>("currency") {
        draft.currency = v.parse::<Currency>()?;
    }
    if let Some(v) = sub.get_one::<String>("date") {
        draft.date = Some(v.clone()).filter(|s| !s.trim().is_empty());
    }
    Ok(draft)
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut store = persistence(conn);
    let draft = apply_fields(store.get_draft().unwrap_or_default(), sub)?;
    store.save_draft(&draft);
    println!("Draft saved");
    Ok(())
}

fn commit(conn: &Connection) -> Result<()> {
    let draft = persistence(conn)
        .get_draft()
        .context("No draft saved; use `dompet draft set` first")?;
    let tx = submit(conn, &draft)?;
    println!("Recorded draft as {}", tx.id);
    Ok(())
}
