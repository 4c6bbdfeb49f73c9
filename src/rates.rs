// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Latest exchange rates, cached per base currency for the session.

use std::collections::HashMap;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::kv::KeyValueStore;
use crate::models::{Currency, RateSnapshot, RateTable};
use crate::utils::{http_client, Clock, SystemClock};

/// How long a fetched snapshot is served without asking the provider again.
pub const CACHE_TTL_MS: i64 = 60 * 60 * 1000;

/// Base the static table below is expressed in.
pub const FALLBACK_BASE: Currency = Currency::Usd;

/// Approximate rates used when the live API cannot be reached.
pub static FALLBACK_RATES: Lazy<RateTable> = Lazy::new(|| {
    RateTable::from([
        ("USD".to_string(), Decimal::ONE),
        ("IDR".to_string(), Decimal::new(16000, 0)),
        ("EUR".to_string(), Decimal::new(92, 2)),
    ])
});

pub fn cache_key(base: Currency) -> String {
    format!("exchange_rates_{}", base.code())
}

pub trait RateSource {
    /// Latest rates with `base` as the reference currency, as the provider
    /// returns them.
    fn latest(&self, base: Currency) -> Result<RateTable>;
}

impl<R: RateSource + ?Sized> RateSource for &R {
    fn latest(&self, base: Currency) -> Result<RateTable> {
        (**self).latest(base)
    }
}

#[derive(Debug, Deserialize)]
struct Latest {
    rates: HashMap<String, f64>,
}

/// Frankfurter (ECB) `latest` endpoint.
pub struct HttpRateSource {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl HttpRateSource {
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl RateSource for HttpRateSource {
    fn latest(&self, base: Currency) -> Result<RateTable> {
        let url = format!("{}/latest?from={}", self.base_url, base.code());
        let resp = self
            .client
            .get(&url)
            .send()
            .with_context(|| format!("GET {}", url))?
            .error_for_status()?;
        let body: Latest = resp.json().context("Decode rates response")?;
        let mut out = RateTable::new();
        for (code, rate) in body.rates {
            let d = Decimal::try_from(rate)
                .with_context(|| format!("Invalid rate '{}' for {}", rate, code))?;
            out.insert(code, d);
        }
        Ok(out)
    }
}

pub struct RateService<R: RateSource, K: KeyValueStore, C: Clock = SystemClock> {
    source: R,
    session: K,
    clock: C,
}

impl<R: RateSource, K: KeyValueStore> RateService<R, K> {
    pub fn new(source: R, session: K) -> Self {
        Self::with_clock(source, session, SystemClock)
    }
}

impl<R: RateSource, K: KeyValueStore, C: Clock> RateService<R, K, C> {
    pub fn with_clock(source: R, session: K, clock: C) -> Self {
        Self {
            source,
            session,
            clock,
        }
    }

    /// Rates relative to `base`, with `base` itself at exactly 1.
    ///
    /// Served from the session cache for an hour after a successful fetch.
    /// When the provider fails, the static table rescaled to `base` is
    /// returned instead, so this never fails.
    pub fn get_latest_rates(&mut self, base: Currency) -> RateTable {
        let key = cache_key(base);
        let now = self.clock.now_millis();
        if let Some(snap) = self.cached(&key) {
            if now - snap.timestamp < CACHE_TTL_MS {
                debug!(base = %base, "exchange rates served from session cache");
                return snap.rates;
            }
        }

        match self.source.latest(base) {
            Ok(mut rates) => {
                rates.remove(base.code());
                rates.insert(base.code().to_string(), Decimal::ONE);
                let snap = RateSnapshot {
                    rates: rates.clone(),
                    timestamp: now,
                };
                match serde_json::to_string(&snap) {
                    Ok(s) => {
                        if let Err(e) = self.session.set(&key, &s) {
                            warn!(error = %e, "could not cache exchange rates");
                        }
                    }
                    Err(e) => warn!(error = %e, "could not serialize exchange rates"),
                }
                info!(base = %base, count = rates.len(), "fetched exchange rates");
                rates
            }
            Err(e) => {
                warn!(base = %base, error = %e, "exchange rate fetch failed, using static fallback");
                fallback_rates(base)
            }
        }
    }

    fn cached(&self, key: &str) -> Option<RateSnapshot> {
        let raw = self.session.get(key).ok().flatten()?;
        match serde_json::from_str(&raw) {
            Ok(s) => Some(s),
            Err(e) => {
                debug!(key, error = %e, "discarding unreadable rate cache entry");
                None
            }
        }
    }
}

/// The static table re-expressed relative to `base`.
pub fn fallback_rates(base: Currency) -> RateTable {
    let Some(divisor) = FALLBACK_RATES.get(base.code()).copied().filter(|d| !d.is_zero()) else {
        return FALLBACK_RATES.clone();
    };
    FALLBACK_RATES
        .iter()
        .map(|(code, rate)| (code.clone(), *rate / divisor))
        .collect()
}
