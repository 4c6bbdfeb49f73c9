// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Persistence of transactions, settings and the small pieces of UI state
//! that outlive a run. Nothing here returns an error: reads degrade to
//! defaults and writes are best-effort, with failures logged.

use std::collections::HashSet;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::kv::KeyValueStore;
use crate::models::{AppSettings, Currency, Transaction, TransactionDraft};
use crate::sanitize::{decode_transactions, DecodeContext};
use crate::utils::{Clock, SystemClock};

pub const TRANSACTIONS_KEY: &str = "finance_transactions";
pub const SETTINGS_KEY: &str = "finance_settings";
pub const DRAFT_KEY: &str = "finance_tx_draft";
pub const PRIVACY_KEY: &str = "finance_privacy_mode";
pub const INSIGHTS_KEY: &str = "finance_saved_insights";
pub const INSTALL_DISMISSED_KEY: &str = "pwa_install_dismissed";

pub struct Persistence<S: KeyValueStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: KeyValueStore, C: Clock> Persistence<S, C> {
    pub fn with_clock(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(v) => v,
            Err(e) => {
                warn!(key, error = %e, "storage read failed");
                None
            }
        }
    }

    fn write_raw(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set(key, value) {
            warn!(key, error = %e, "storage write failed");
        }
    }

    fn read_json(&self, key: &str) -> Option<Value> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str::<Value>(&raw) {
            Ok(v) => Some(v),
            Err(e) => {
                warn!(key, error = %e, "stored value is not valid JSON, ignoring it");
                None
            }
        }
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) {
        let res: Result<String> =
            serde_json::to_string(value).with_context(|| format!("Serialize '{}'", key));
        match res {
            Ok(s) => self.write_raw(key, &s),
            Err(e) => warn!(key, error = %e, "storage write skipped"),
        }
    }

    fn read_typed<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let v = self.read_json(key)?;
        match serde_json::from_value(v) {
            Ok(t) => Some(t),
            Err(e) => {
                warn!(key, error = %e, "stored value has an unexpected shape, ignoring it");
                None
            }
        }
    }

    // Transactions

    /// Newest first. Absent, malformed or non-array data is an empty list.
    ///
    /// Entries stored without a usable id get a fresh one, and the list is
    /// written back once so later reads (and deletes) see the same id.
    pub fn get_transactions(&mut self) -> Vec<Transaction> {
        let Some(raw) = self.read_json(TRANSACTIONS_KEY) else {
            return Vec::new();
        };
        let ctx = DecodeContext {
            language: self.get_settings().language,
            now: self.clock.now(),
            primary: Currency::PRIMARY,
        };
        let mut minted_ids = 0;
        let list: Vec<Transaction> = decode_transactions(&raw, &ctx)
            .into_iter()
            .map(|d| {
                if !d.defaulted.is_empty() {
                    debug!(id = %d.tx.id, fields = ?d.defaulted, "sanitized stored transaction");
                }
                if d.defaulted.contains(&"id") {
                    minted_ids += 1;
                }
                d.tx
            })
            .collect();
        if minted_ids > 0 {
            info!(count = minted_ids, "persisting generated transaction ids");
            self.write_json(TRANSACTIONS_KEY, &list);
        }
        list
    }

    pub fn save_transaction(&mut self, tx: Transaction) -> Vec<Transaction> {
        let mut list = self.get_transactions();
        list.insert(0, tx);
        self.write_json(TRANSACTIONS_KEY, &list);
        list
    }

    /// Replace the stored list wholesale.
    pub fn override_transactions(&mut self, list: &[Transaction]) {
        self.write_json(TRANSACTIONS_KEY, list);
    }

    pub fn delete_transaction(&mut self, id: &str) -> Vec<Transaction> {
        self.delete_transactions(&[id])
    }

    /// Remove every transaction whose id is in `ids` with a single write.
    pub fn delete_transactions<I: AsRef<str>>(&mut self, ids: &[I]) -> Vec<Transaction> {
        let doomed: HashSet<&str> = ids.iter().map(|i| i.as_ref()).collect();
        let mut list = self.get_transactions();
        list.retain(|t| !doomed.contains(t.id.as_str()));
        self.override_transactions(&list);
        list
    }

    /// Stores an explicit empty list, which is not the same as "never saved".
    pub fn clear_all_transactions(&mut self) {
        self.write_raw(TRANSACTIONS_KEY, "[]");
    }

    // Settings

    /// Stored fields shallow-merged over the defaults. A stored field that no
    /// longer decodes is dropped and its default kept.
    pub fn get_settings(&self) -> AppSettings {
        let defaults = AppSettings::default();
        let Some(Value::Object(stored)) = self.read_json(SETTINGS_KEY) else {
            return defaults;
        };
        let Ok(Value::Object(mut merged)) = serde_json::to_value(&defaults) else {
            return defaults;
        };
        let mut current = defaults;
        for (k, v) in stored {
            if !merged.contains_key(&k) {
                continue;
            }
            let previous = merged.insert(k.clone(), v);
            match serde_json::from_value::<AppSettings>(Value::Object(merged.clone())) {
                Ok(s) => current = s,
                Err(e) => {
                    warn!(field = %k, error = %e, "ignoring invalid stored setting");
                    if let Some(p) = previous {
                        merged.insert(k, p);
                    }
                }
            }
        }
        current
    }

    pub fn save_settings(&mut self, settings: &AppSettings) {
        self.write_json(SETTINGS_KEY, settings);
    }

    // Draft of the transaction form

    pub fn get_draft(&self) -> Option<TransactionDraft> {
        self.read_typed(DRAFT_KEY)
    }

    pub fn save_draft(&mut self, draft: &TransactionDraft) {
        self.write_json(DRAFT_KEY, draft);
    }

    pub fn clear_draft(&mut self) {
        if let Err(e) = self.store.remove(DRAFT_KEY) {
            warn!(error = %e, "failed to clear draft");
        }
    }

    // Privacy mode

    pub fn privacy_mode(&self) -> bool {
        self.read_raw(PRIVACY_KEY).is_some_and(|v| v == "true")
    }

    pub fn set_privacy_mode(&mut self, on: bool) {
        self.write_raw(PRIVACY_KEY, if on { "true" } else { "false" });
    }

    // Saved AI insights, newest first

    pub fn saved_insights(&self) -> Vec<String> {
        self.read_typed(INSIGHTS_KEY).unwrap_or_default()
    }

    pub fn save_insight(&mut self, text: &str) -> Vec<String> {
        let mut list = self.saved_insights();
        if !list.iter().any(|s| s == text) {
            list.insert(0, text.to_string());
            self.write_json(INSIGHTS_KEY, &list);
        }
        list
    }

    pub fn delete_insight(&mut self, index: usize) -> Vec<String> {
        let mut list = self.saved_insights();
        if index < list.len() {
            list.remove(index);
            self.write_json(INSIGHTS_KEY, &list);
        }
        list
    }

    // Install prompt

    pub fn install_prompt_dismissed_at(&self) -> Option<DateTime<Utc>> {
        self.read_raw(INSTALL_DISMISSED_KEY)
            .and_then(|s| s.trim().parse::<i64>().ok())
            .and_then(DateTime::<Utc>::from_timestamp_millis)
    }

    pub fn dismiss_install_prompt(&mut self) {
        let now = self.clock.now_millis().to_string();
        self.write_raw(INSTALL_DISMISSED_KEY, &now);
    }
}
