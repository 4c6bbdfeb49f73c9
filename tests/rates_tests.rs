// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::Cell;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Duration, TimeZone, Utc};
use dompet::kv::{KeyValueStore, MemoryStore};
use dompet::models::{Currency, RateSnapshot, RateTable};
use dompet::rates::{cache_key, fallback_rates, RateService, RateSource};
use dompet::utils::Clock;
use rust_decimal::Decimal;

struct ManualClock(Cell<DateTime<Utc>>);

impl ManualClock {
    fn new() -> Self {
        Self(Cell::new(Utc.with_ymd_and_hms(2025, 8, 1, 10, 0, 0).unwrap()))
    }
    fn advance(&self, d: Duration) {
        self.0.set(self.0.get() + d);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        self.0.get()
    }
}

struct FakeSource {
    calls: Cell<usize>,
    fail: Cell<bool>,
}

impl FakeSource {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
            fail: Cell::new(false),
        }
    }
}

impl RateSource for FakeSource {
    fn latest(&self, base: Currency) -> Result<RateTable> {
        self.calls.set(self.calls.get() + 1);
        if self.fail.get() {
            return Err(anyhow!("network unreachable"));
        }
        let mut t = RateTable::new();
        // provider echoes a bogus self rate
        t.insert(base.code().to_string(), Decimal::new(5, 1));
        t.insert("EUR".to_string(), Decimal::new(92, 2));
        t.insert("IDR".to_string(), Decimal::new(16250, 0));
        t.insert("JPY".to_string(), Decimal::new(147, 0));
        Ok(t)
    }
}

#[test]
fn second_call_within_an_hour_uses_session_cache() {
    let source = FakeSource::new();
    let clock = ManualClock::new();
    let mut svc = RateService::with_clock(&source, MemoryStore::new(), &clock);

    let first = svc.get_latest_rates(Currency::Usd);
    clock.advance(Duration::minutes(59));
    let second = svc.get_latest_rates(Currency::Usd);
    assert_eq!(source.calls.get(), 1);
    assert_eq!(first, second);

    clock.advance(Duration::minutes(2));
    svc.get_latest_rates(Currency::Usd);
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn cache_is_keyed_by_base() {
    let source = FakeSource::new();
    let clock = ManualClock::new();
    let mut svc = RateService::with_clock(&source, MemoryStore::new(), &clock);
    svc.get_latest_rates(Currency::Usd);
    svc.get_latest_rates(Currency::Eur);
    svc.get_latest_rates(Currency::Usd);
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn base_entry_is_forced_to_one_and_snapshot_is_cached() {
    let source = FakeSource::new();
    let clock = ManualClock::new();
    let mut session = MemoryStore::new();
    let rates = RateService::with_clock(&source, &mut session, &clock).get_latest_rates(Currency::Usd);

    assert_eq!(rates.get("USD"), Some(&Decimal::ONE));
    assert_eq!(rates.get("EUR"), Some(&Decimal::new(92, 2)));

    let raw = session.get(&cache_key(Currency::Usd)).unwrap().unwrap();
    let snap: RateSnapshot = serde_json::from_str(&raw).unwrap();
    assert_eq!(snap.rates, rates);
    assert_eq!(snap.timestamp, clock.now_millis());
    assert_eq!(cache_key(Currency::Usd), "exchange_rates_USD");
}

#[test]
fn network_failure_falls_back_to_rescaled_static_table() {
    let source = FakeSource::new();
    source.fail.set(true);
    let clock = ManualClock::new();
    let mut svc = RateService::with_clock(&source, MemoryStore::new(), &clock);

    let rates = svc.get_latest_rates(Currency::Idr);
    let idr = Decimal::new(16000, 0);
    assert_eq!(rates.get("IDR"), Some(&Decimal::ONE));
    assert_eq!(rates.get("USD"), Some(&(Decimal::ONE / idr)));
    assert_eq!(rates.get("EUR"), Some(&(Decimal::new(92, 2) / idr)));
    assert_eq!(rates, fallback_rates(Currency::Idr));

    // fallbacks are not cached; the next call tries the network again
    svc.get_latest_rates(Currency::Idr);
    assert_eq!(source.calls.get(), 2);
}

#[test]
fn fallback_for_table_base_is_the_table_itself() {
    let usd = fallback_rates(Currency::Usd);
    assert_eq!(usd.get("USD"), Some(&Decimal::ONE));
    assert_eq!(usd.get("IDR"), Some(&Decimal::new(16000, 0)));
    assert_eq!(usd.get("EUR"), Some(&Decimal::new(92, 2)));
}

#[test]
fn unreadable_cache_entry_is_refetched() {
    let source = FakeSource::new();
    let clock = ManualClock::new();
    let mut session = MemoryStore::new();
    session.set(&cache_key(Currency::Eur), "garbage").unwrap();
    let rates = RateService::with_clock(&source, &mut session, &clock).get_latest_rates(Currency::Eur);
    assert_eq!(source.calls.get(), 1);
    assert_eq!(rates.get("EUR"), Some(&Decimal::ONE));
}
