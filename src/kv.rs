// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! String key-value stores backing local and session storage.

use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
    fn clear(&mut self) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
    fn remove(&mut self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
    fn clear(&mut self) -> Result<()> {
        (**self).clear()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Local,
    Session,
}

impl Scope {
    fn table(&self) -> &'static str {
        match self {
            Scope::Local => "local_storage",
            Scope::Session => "session_storage",
        }
    }
}

/// A storage scope living in one of the SQLite key-value tables.
pub struct SqliteStore<'a> {
    conn: &'a Connection,
    scope: Scope,
}

impl<'a> SqliteStore<'a> {
    pub fn local(conn: &'a Connection) -> Self {
        Self {
            conn,
            scope: Scope::Local,
        }
    }

    pub fn session(conn: &'a Connection) -> Self {
        Self {
            conn,
            scope: Scope::Session,
        }
    }
}

impl KeyValueStore for SqliteStore<'_> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let sql = format!("SELECT value FROM {} WHERE key=?1", self.scope.table());
        let v: Option<String> = self
            .conn
            .query_row(&sql, params![key], |r| r.get(0))
            .optional()
            .with_context(|| format!("Read '{}' from {}", key, self.scope.table()))?;
        Ok(v)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let sql = format!(
            "INSERT INTO {}(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            self.scope.table()
        );
        self.conn
            .execute(&sql, params![key, value])
            .with_context(|| format!("Write '{}' to {}", key, self.scope.table()))?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let sql = format!("DELETE FROM {} WHERE key=?1", self.scope.table());
        self.conn.execute(&sql, params![key])?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        let sql = format!("DELETE FROM {}", self.scope.table());
        self.conn.execute(&sql, [])?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
    fn remove(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
    fn clear(&mut self) -> Result<()> {
        self.items.clear();
        Ok(())
    }
}
