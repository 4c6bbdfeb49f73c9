// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use super::Response;

/// Named response caches keyed by request URL.
pub trait CacheStorage {
    fn put(&mut self, cache: &str, key: &str, resp: &Response) -> Result<()>;
    fn lookup(&self, cache: &str, key: &str) -> Result<Option<Response>>;
    /// First match across all caches, oldest cache first.
    fn match_any(&self, key: &str) -> Result<Option<Response>>;
    fn cache_names(&self) -> Result<Vec<String>>;
    fn delete_cache(&mut self, cache: &str) -> Result<bool>;
}

pub struct SqliteCache<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteCache<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Entry count per cache, for status output.
    pub fn summary(&self) -> Result<Vec<(String, i64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT cache_name, COUNT(*) FROM cache_entries GROUP BY cache_name ORDER BY MIN(id)",
        )?;
        let rows = stmt.query_map([], |r| Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?)))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

fn row_to_response(r: &rusqlite::Row<'_>) -> rusqlite::Result<Response> {
    Ok(Response {
        status: r.get::<_, u16>(0)?,
        content_type: r.get(1)?,
        body: r.get(2)?,
    })
}

impl CacheStorage for SqliteCache<'_> {
    fn put(&mut self, cache: &str, key: &str, resp: &Response) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO cache_entries(cache_name, request_key, status, content_type, body)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(cache_name, request_key) DO UPDATE SET
                    status=excluded.status,
                    content_type=excluded.content_type,
                    body=excluded.body,
                    stored_at=datetime('now')",
                params![cache, key, resp.status, resp.content_type, resp.body],
            )
            .with_context(|| format!("Store {} in cache {}", key, cache))?;
        Ok(())
    }

    fn lookup(&self, cache: &str, key: &str) -> Result<Option<Response>> {
        let r = self
            .conn
            .query_row(
                "SELECT status, content_type, body FROM cache_entries
                 WHERE cache_name=?1 AND request_key=?2",
                params![cache, key],
                row_to_response,
            )
            .optional()?;
        Ok(r)
    }

    fn match_any(&self, key: &str) -> Result<Option<Response>> {
        let r = self
            .conn
            .query_row(
                "SELECT e.status, e.content_type, e.body FROM cache_entries e
                 JOIN (SELECT cache_name, MIN(id) AS first_id FROM cache_entries GROUP BY cache_name) c
                   ON c.cache_name = e.cache_name
                 WHERE e.request_key=?1
                 ORDER BY c.first_id LIMIT 1",
                params![key],
                row_to_response,
            )
            .optional()?;
        Ok(r)
    }

    fn cache_names(&self) -> Result<Vec<String>> {
        Ok(self.summary()?.into_iter().map(|(name, _)| name).collect())
    }

    fn delete_cache(&mut self, cache: &str) -> Result<bool> {
        let n = self
            .conn
            .execute("DELETE FROM cache_entries WHERE cache_name=?1", params![cache])?;
        Ok(n > 0)
    }
}

/// In-memory caches, in creation order.
#[derive(Debug, Default, Clone)]
pub struct MemoryCache {
    caches: Vec<(String, BTreeMap<String, Response>)>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CacheStorage for MemoryCache {
    fn put(&mut self, cache: &str, key: &str, resp: &Response) -> Result<()> {
        match self.caches.iter_mut().find(|(name, _)| name == cache) {
            Some((_, entries)) => {
                entries.insert(key.to_string(), resp.clone());
            }
            None => {
                let entries = BTreeMap::from([(key.to_string(), resp.clone())]);
                self.caches.push((cache.to_string(), entries));
            }
        }
        Ok(())
    }

    fn lookup(&self, cache: &str, key: &str) -> Result<Option<Response>> {
        Ok(self
            .caches
            .iter()
            .find(|(name, _)| name == cache)
            .and_then(|(_, entries)| entries.get(key).cloned()))
    }

    fn match_any(&self, key: &str) -> Result<Option<Response>> {
        Ok(self
            .caches
            .iter()
            .find_map(|(_, entries)| entries.get(key).cloned()))
    }

    fn cache_names(&self) -> Result<Vec<String>> {
        Ok(self.caches.iter().map(|(name, _)| name.clone()).collect())
    }

    fn delete_cache(&mut self, cache: &str) -> Result<bool> {
        let before = self.caches.len();
        self.caches.retain(|(name, _)| name != cache);
        Ok(self.caches.len() != before)
    }
}
