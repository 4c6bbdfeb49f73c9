// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{display_currency, latest_rates, money, persistence};
use crate::config::Config;
use crate::i18n::{t, Text};
use crate::report::summarize;
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("summary", sub)) => summary(conn, cfg, sub)?,
        Some(("by-category", sub)) => by_category(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn summary(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let mut store = persistence(conn);
    let settings = store.get_settings();
    let privacy = store.privacy_mode();
    let ccy = display_currency(conn, sub)?;
    let txs = store.get_transactions();
    let rates = latest_rates(conn, cfg, ccy);
    let s = summarize(&txs, ccy, Some(&rates));
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let lang = settings.language;
    let rows = vec![
        vec![t(lang, Text::Income).to_string(), money(&s.income, ccy, privacy, lang)],
        vec![t(lang, Text::Expense).to_string(), money(&s.expense, ccy, privacy, lang)],
        vec![t(lang, Text::Balance).to_string(), money(&s.balance, ccy, privacy, lang)],
    ];
    println!("{}", pretty_table(&["", &format!("{} ({})", settings.username, ccy)], rows));
    if s.unconverted > 0 {
        println!("{} transaction(s) shown unconverted: rate missing", s.unconverted);
    }
    Ok(())
}

fn by_category(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let mut store = persistence(conn);
    let lang = store.get_settings().language;
    let privacy = store.privacy_mode();
    let ccy = display_currency(conn, sub)?;
    let rates = latest_rates(conn, cfg, ccy);
    let s = summarize(&store.get_transactions(), ccy, Some(&rates));
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s.by_category)? {
        return Ok(());
    }
    let data: Vec<Vec<String>> = s
        .by_category
        .iter()
        .map(|c| {
            vec![
                c.category.clone(),
                money(&c.amount, ccy, privacy, lang),
                format!("{}%", c.share),
            ]
        })
        .collect();
    let hdr = format!("Spent ({})", ccy);
    println!("{}", pretty_table(&["Category", &hdr, "Share"], data));
    Ok(())
}
