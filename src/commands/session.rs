// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;

use crate::kv::{KeyValueStore, SqliteStore};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    if let Some(("end", _)) = m.subcommand() {
        SqliteStore::session(conn).clear()?;
        println!("Session ended; cached exchange rates forgotten");
    }
    Ok(())
}
