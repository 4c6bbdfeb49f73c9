// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Result};
use rusqlite::Connection;
use tracing::warn;

use super::{latest_rates, persistence};
use crate::config::Config;
use crate::insight::{generate_insight, GeminiClient, InsightModel};
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("generate", sub)) => generate(conn, cfg, sub)?,
        Some(("list", _)) => list(conn),
        Some(("rm", sub)) => remove(conn, *sub.get_one::<usize>("index").unwrap())?,
        _ => {}
    }
    Ok(())
}

fn model_from(cfg: &Config) -> Option<GeminiClient> {
    let key = cfg.gemini_api_key.as_deref()?;
    match GeminiClient::new(&cfg.gemini_url, &cfg.gemini_model, key) {
        Ok(c) => Some(c),
        Err(e) => {
            warn!(error = %e, "could not build AI client");
            None
        }
    }
}

fn generate(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let mut store = persistence(conn);
    let settings = store.get_settings();
    let txs = store.get_transactions();
    let rates = latest_rates(conn, cfg, settings.currency);
    let model = model_from(cfg);
    let text = generate_insight(
        model.as_ref().map(|m| m as &dyn InsightModel),
        &txs,
        &settings,
        Some(&rates),
    );
    println!("{}", text);
    if sub.get_flag("save") {
        store.save_insight(&text);
    }
    Ok(())
}

fn list(conn: &Connection) {
    let data: Vec<Vec<String>> = persistence(conn)
        .saved_insights()
        .into_iter()
        .enumerate()
        .map(|(i, s)| vec![i.to_string(), s])
        .collect();
    println!("{}", pretty_table(&["#", "Insight"], data));
}

fn remove(conn: &Connection, index: usize) -> Result<()> {
    let mut store = persistence(conn);
    let before = store.saved_insights().len();
    if index >= before {
        bail!("No saved insight #{} (have {})", index, before);
    }
    store.delete_insight(index);
    println!("Removed insight #{}", index);
    Ok(())
}
