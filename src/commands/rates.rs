// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::{latest_rates, persistence};
use crate::config::Config;
use crate::models::Currency;
use crate::utils::{fmt_money, fx_convert, maybe_print_json, parse_decimal, pretty_table};

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, cfg, sub)?,
        Some(("convert", sub)) => convert_amount(conn, cfg, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let base = match sub.get_one::<String>("base") {
        Some(b) => b.parse::<Currency>()?,
        None => persistence(conn).get_settings().currency,
    };
    let rates = latest_rates(conn, cfg, base);
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &rates)? {
        return Ok(());
    }
    let data: Vec<Vec<String>> = rates
        .iter()
        .map(|(code, rate)| vec![base.to_string(), code.clone(), rate.normalize().to_string()])
        .collect();
    println!("{}", pretty_table(&["Base", "Quote", "Rate"], data));
    Ok(())
}

fn convert_amount(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap())?;
    let from = sub.get_one::<String>("from").unwrap().parse::<Currency>()?;
    let to = sub.get_one::<String>("to").unwrap().parse::<Currency>()?;
    let display = persistence(conn).get_settings().currency;
    let rates = latest_rates(conn, cfg, display);
    let res = fx_convert(amount, from, to, Some(&rates));
    if res.missing_rate {
        println!("No rate available for {} -> {}; amount left unconverted", from, to);
    }
    println!("{} -> {}", fmt_money(&amount, from), fmt_money(&res.amount, to));
    Ok(())
}
