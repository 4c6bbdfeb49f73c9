// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::Path;

use anyhow::Result;
use rusqlite::Connection;

use super::persistence;
use crate::avatar::load_avatar;
use crate::models::{AppSettings, Currency, Language, Theme};
use crate::utils::{maybe_print_json, pretty_table};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", sub)) => show(conn, sub)?,
        Some(("set", sub)) => set(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let s = persistence(conn).get_settings();
    if maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &s)? {
        return Ok(());
    }
    let avatar = match &s.avatar {
        Some(a) => format!("set ({} bytes)", a.len()),
        None => "none".to_string(),
    };
    let rows = vec![
        vec!["currency".into(), s.currency.to_string()],
        vec!["language".into(), format!("{:?}", s.language).to_lowercase()],
        vec!["theme".into(), format!("{:?}", s.theme).to_lowercase()],
        vec!["username".into(), s.username.clone()],
        vec!["avatar".into(), avatar],
    ];
    println!("{}", pretty_table(&["Setting", "Value"], rows));
    Ok(())
}

/// Apply the given flags on top of `current`. The avatar is loaded before
/// anything changes, so a bad image leaves the settings untouched.
pub fn apply_changes(mut current: AppSettings, sub: &clap::ArgMatches) -> Result<AppSettings> {
    if let Some(path) = sub.get_one::<String>("avatar") {
        current.avatar = Some(load_avatar(Path::new(path))?);
    }
    if sub.get_flag("clear-avatar") {
        current.avatar = None;
    }
    if let Some(v) = sub.get_one::<String>("currency") {
        current.currency = v.parse::<Currency>()?;
    }
    if let Some(v) = sub.get_one::<String>("language") {
        current.language = v.parse::<Language>()?;
    }
    if let Some(v) = sub.get_one::<String>("theme") {
        current.theme = v.parse::<Theme>()?;
    }
    if let Some(v) = sub.get_one::<String>("username") {
        current.username = v.trim().to_string();
    }
    Ok(current)
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let mut store = persistence(conn);
    let updated = apply_changes(store.get_settings(), sub)?;
    store.save_settings(&updated);
    println!("Settings saved");
    Ok(())
}
