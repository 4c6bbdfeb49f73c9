// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod draft;
pub mod exporter;
pub mod insight;
pub mod offline;
pub mod privacy;
pub mod rates;
pub mod reports;
pub mod session;
pub mod settings;
pub mod transactions;

use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use tracing::warn;

use crate::config::Config;
use crate::i18n::{t, Text};
use crate::kv::SqliteStore;
use crate::models::{Currency, Language, RateTable};
use crate::rates::{fallback_rates, HttpRateSource, RateService};
use crate::storage::Persistence;
use crate::utils::fmt_money;

pub(crate) fn persistence(conn: &Connection) -> Persistence<SqliteStore<'_>> {
    Persistence::new(SqliteStore::local(conn))
}

/// Rates relative to `base`, through the session cache.
pub(crate) fn latest_rates(conn: &Connection, cfg: &Config, base: Currency) -> RateTable {
    match HttpRateSource::new(&cfg.rates_url) {
        Ok(source) => RateService::new(source, SqliteStore::session(conn)).get_latest_rates(base),
        Err(e) => {
            warn!(error = %e, "could not build HTTP client, using static rates");
            fallback_rates(base)
        }
    }
}

/// `--currency` if given, else the display currency from settings.
pub(crate) fn display_currency(conn: &Connection, sub: &clap::ArgMatches) -> Result<Currency> {
    match sub.get_one::<String>("currency") {
        Some(c) => c.parse(),
        None => Ok(persistence(conn).get_settings().currency),
    }
}

pub(crate) fn money(d: &Decimal, ccy: Currency, privacy: bool, lang: Language) -> String {
    if privacy {
        t(lang, Text::Hidden).to_string()
    } else {
        fmt_money(d, ccy)
    }
}
