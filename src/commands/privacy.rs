// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use super::persistence;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let mut store = persistence(conn);
    match m.subcommand() {
        Some(("on", _)) => store.set_privacy_mode(true),
        Some(("off", _)) => store.set_privacy_mode(false),
        _ => {}
    }
    let state = if store.privacy_mode() { "on" } else { "off" };
    println!("Privacy mode is {}", state);
    Ok(())
}
