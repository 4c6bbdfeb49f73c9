// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use chrono::Utc;
use rusqlite::Connection;

use super::{latest_rates, money, persistence};
use crate::config::Config;
use crate::form::validate_draft;
use crate::models::{Currency, Transaction, TransactionDraft, TxType};
use crate::utils::{fx_convert, maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, cfg, sub)?,
        Some(("rm", sub)) => remove(conn, sub)?,
        Some(("clear", sub)) => clear(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// Validate and save one transaction. Field errors are all reported and
/// nothing is written.
pub fn submit(conn: &Connection, draft: &TransactionDraft) -> Result<Transaction> {
    let tx = match validate_draft(draft, Utc::now()) {
        Ok(tx) => tx,
        Err(errs) => {
            for e in &errs.0 {
                eprintln!("  {}: {}", e.field(), e);
            }
            return Err(errs.into());
        }
    };
    let mut store = persistence(conn);
    store.save_transaction(tx.clone());
    store.clear_draft();
    Ok(tx)
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let currency = match sub.get_one::<String>("currency") {
        Some(c) => c.parse::<Currency>()?,
        None => persistence(conn).get_settings().currency,
    };
    let draft = TransactionDraft {
        amount: sub.get_one::<String>("amount").unwrap().to_string(),
        description: sub.get_one::<String>("description").unwrap().to_string(),
        category: sub.get_one::<String>("category").unwrap().to_string(),
        r#type: sub.get_one::<String>("type").unwrap().parse::<TxType>()?,
        currency,
        date: sub.get_one::<String>("date").map(|s| s.to_string()),
    };
    let tx = submit(conn, &draft)?;
    println!(
        "Recorded {} {} {} '{}' ({}) id={}",
        tx.r#type.as_str(),
        tx.amount,
        tx.currency,
        tx.description,
        tx.category,
        tx.id
    );
    Ok(())
}

/// Stored transactions after the `--type`/`--category`/`--limit` filters.
pub fn query_rows(conn: &Connection, sub: &clap::ArgMatches) -> Result<Vec<Transaction>> {
    let kind = sub
        .get_one::<String>("type")
        .map(|s| s.parse::<TxType>())
        .transpose()?;
    let category = sub.get_one::<String>("category").map(|s| s.trim().to_lowercase());
    let limit = sub.get_one::<usize>("limit").copied();

    let rows = persistence(conn)
        .get_transactions()
        .into_iter()
        .filter(|t| kind.is_none_or(|k| t.r#type == k))
        .filter(|t| {
            category
                .as_deref()
                .is_none_or(|c| t.category.to_lowercase() == c)
        })
        .take(limit.unwrap_or(usize::MAX))
        .collect();
    Ok(rows)
}

fn list(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let data = query_rows(conn, sub)?;
    if maybe_print_json(json_flag, jsonl_flag, &data)? {
        return Ok(());
    }

    let store = persistence(conn);
    let settings = store.get_settings();
    let privacy = store.privacy_mode();
    let target = sub
        .get_one::<String>("currency")
        .map(|c| c.parse::<Currency>())
        .transpose()?;
    let rates = target.map(|c| latest_rates(conn, cfg, c));

    let rows: Vec<Vec<String>> = data
        .iter()
        .map(|t| {
            let mut row = vec![
                t.date.format("%Y-%m-%d").to_string(),
                t.id.clone(),
                t.description.clone(),
                t.category.clone(),
                t.r#type.as_str().to_string(),
                money(&t.amount, t.currency, privacy, settings.language),
            ];
            if let Some(c) = target {
                let conv = fx_convert(t.amount, t.currency, c, rates.as_ref());
                let mut shown = money(&conv.amount, c, privacy, settings.language);
                if conv.missing_rate {
                    shown.push_str(" (unconverted)");
                }
                row.push(shown);
            }
            row
        })
        .collect();

    let display_hdr = target.map(|c| format!("In {}", c));
    let mut headers = vec!["Date", "ID", "Description", "Category", "Type", "Amount"];
    if let Some(h) = &display_hdr {
        headers.push(h.as_str());
    }
    println!("{}", pretty_table(&headers, rows));
    Ok(())
}

fn remove(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let ids: Vec<String> = sub
        .get_many::<String>("ids")
        .map(|v| v.map(|s| s.trim().to_string()).collect())
        .unwrap_or_default();
    let mut store = persistence(conn);
    let before = store.get_transactions().len();
    let after = if ids.len() == 1 {
        store.delete_transaction(&ids[0])
    } else {
        store.delete_transactions(&ids)
    };
    println!("Removed {} transaction(s)", before - after.len());
    Ok(())
}

fn clear(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    if !sub.get_flag("yes") {
        bail!("Refusing to delete every transaction without --yes");
    }
    persistence(conn).clear_all_transactions();
    println!("All transactions deleted");
    Ok(())
}
