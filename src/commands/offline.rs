// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{bail, Context, Result};
use reqwest::Url;
use rusqlite::Connection;

use crate::config::Config;
use crate::offline::{HttpNetwork, OfflineWorker, Phase, Request, SqliteCache, WorkerConfig};
use crate::utils::pretty_table;

pub fn handle(conn: &Connection, cfg: &Config, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("install", _)) => install(conn, cfg)?,
        Some(("activate", _)) => activate(conn, cfg)?,
        Some(("fetch", sub)) => fetch(conn, cfg, sub)?,
        Some(("status", _)) => status(conn, cfg)?,
        _ => {}
    }
    Ok(())
}

fn worker<'a>(conn: &'a Connection, cfg: &Config) -> Result<OfflineWorker<HttpNetwork, SqliteCache<'a>>> {
    OfflineWorker::resume(
        HttpNetwork::new()?,
        SqliteCache::new(conn),
        WorkerConfig::new(cfg.origin.clone()),
    )
}

fn install(conn: &Connection, cfg: &Config) -> Result<()> {
    let mut w = OfflineWorker::new(
        HttpNetwork::new()?,
        SqliteCache::new(conn),
        WorkerConfig::new(cfg.origin.clone()),
    );
    w.install()?;
    let deleted = w.activate()?;
    println!(
        "Shell cached in {} ({} assets); removed {} stale cache(s)",
        w.config().static_cache,
        w.config().shell_assets.len(),
        deleted.len()
    );
    Ok(())
}

fn activate(conn: &Connection, cfg: &Config) -> Result<()> {
    let mut w = worker(conn, cfg)?;
    if w.phase() != Phase::Active {
        bail!("Shell is not installed yet; run `dompet offline install`");
    }
    let deleted = w.activate()?;
    println!("Removed {} stale cache(s)", deleted.len());
    Ok(())
}

fn fetch(conn: &Connection, cfg: &Config, sub: &clap::ArgMatches) -> Result<()> {
    let raw = sub.get_one::<String>("url").unwrap();
    let url = Url::parse(raw)
        .or_else(|_| cfg.origin.join(raw))
        .with_context(|| format!("Invalid URL '{}'", raw))?;
    let method = sub.get_one::<String>("method").unwrap();
    let req = if sub.get_flag("navigate") {
        Request::navigate(url)
    } else {
        Request::get(url)
    };
    let req = req.with_method(method);

    let mut w = worker(conn, cfg)?;
    let resp = w.handle(&req)?;
    eprintln!(
        "{} {} ({} bytes)",
        resp.status,
        resp.content_type.as_deref().unwrap_or("-"),
        resp.body.len()
    );
    match sub.get_one::<String>("out") {
        Some(path) => {
            std::fs::write(path, &resp.body).with_context(|| format!("Write {}", path))?;
            println!("Saved body to {}", path);
        }
        None => println!("{}", String::from_utf8_lossy(&resp.body)),
    }
    Ok(())
}

fn status(conn: &Connection, cfg: &Config) -> Result<()> {
    let w = worker(conn, cfg)?;
    let current = [w.config().static_cache.as_str(), w.config().dynamic_cache.as_str()];
    let data: Vec<Vec<String>> = w
        .caches()
        .summary()?
        .into_iter()
        .map(|(name, count)| {
            let state = if current.contains(&name.as_str()) { "current" } else { "stale" };
            vec![name, count.to_string(), state.to_string()]
        })
        .collect();
    println!("Worker phase: {:?}", w.phase());
    println!("{}", pretty_table(&["Cache", "Entries", "State"], data));
    Ok(())
}
