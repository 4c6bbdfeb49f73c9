// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Offline cache worker for the app shell.
//!
//! Requests are classified by [`route`], a pure function, and then served by
//! [`OfflineWorker`] using the matching strategy against a [`CacheStorage`]
//! and a [`Network`]. Two cache partitions exist: the static one filled at
//! install time from the shell asset list, and the dynamic one filled while
//! running. Both names carry a version; activation drops every other cache.

pub mod cache;
pub mod network;

use anyhow::{anyhow, bail, Context, Result};
use reqwest::Url;
use tracing::{debug, info, warn};

pub use cache::{CacheStorage, MemoryCache, SqliteCache};
pub use network::{HttpNetwork, Network};

pub const CACHE_VERSION: u32 = 3;
pub const STATIC_CACHE: &str = "dompet-static-v3";
pub const DYNAMIC_CACHE: &str = "dompet-dynamic-v3";
pub const AI_HOST: &str = "generativelanguage.googleapis.com";

/// Files needed to boot the app with no network.
pub const SHELL_ASSETS: [&str; 5] = [
    "/",
    "/index.html",
    "/manifest.json",
    "/icons/icon-192.png",
    "/icons/icon-512.png",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMode {
    /// A full page load.
    Navigate,
    Subresource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: String,
    pub url: Url,
    pub mode: RequestMode,
}

impl Request {
    pub fn get(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            mode: RequestMode::Subresource,
        }
    }

    pub fn navigate(url: Url) -> Self {
        Self {
            method: "GET".to_string(),
            url,
            mode: RequestMode::Navigate,
        }
    }

    pub fn with_method(mut self, method: &str) -> Self {
        self.method = method.to_uppercase();
        self
    }

    pub fn cache_key(&self) -> &str {
        self.url.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    NetworkFirst,
    CacheFirst,
    Passthrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Not intercepted at all.
    Passthrough,
    /// Calls to the AI provider.
    AiApi,
    /// Page loads; fall back to the cached shell document.
    Navigation,
    StaticAsset,
}

impl Route {
    pub fn strategy(&self) -> Strategy {
        match self {
            Route::Passthrough => Strategy::Passthrough,
            Route::AiApi | Route::Navigation => Strategy::NetworkFirst,
            Route::StaticAsset => Strategy::CacheFirst,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub origin: Url,
    pub static_cache: String,
    pub dynamic_cache: String,
    pub shell_assets: Vec<String>,
    pub ai_host: String,
}

impl WorkerConfig {
    pub fn new(origin: Url) -> Self {
        Self {
            origin,
            static_cache: STATIC_CACHE.to_string(),
            dynamic_cache: DYNAMIC_CACHE.to_string(),
            shell_assets: SHELL_ASSETS.iter().map(|s| s.to_string()).collect(),
            ai_host: AI_HOST.to_string(),
        }
    }

    pub fn shell_root(&self) -> Result<Url> {
        self.origin.join("/").context("Resolve shell root")
    }

    pub fn asset_urls(&self) -> Result<Vec<Url>> {
        self.shell_assets
            .iter()
            .map(|a| {
                self.origin
                    .join(a)
                    .with_context(|| format!("Resolve shell asset '{}'", a))
            })
            .collect()
    }

    fn is_current(&self, cache: &str) -> bool {
        cache == self.static_cache || cache == self.dynamic_cache
    }
}

/// Decide how a request is handled. Pure: looks only at the request and
/// the config.
pub fn route(req: &Request, cfg: &WorkerConfig) -> Route {
    if req.method != "GET" {
        return Route::Passthrough;
    }
    if req.url.scheme().ends_with("-extension") {
        return Route::Passthrough;
    }
    if req.url.host_str() == Some(cfg.ai_host.as_str()) {
        return Route::AiApi;
    }
    if req.mode == RequestMode::Navigate {
        return Route::Navigation;
    }
    Route::StaticAsset
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Installing,
    Activating,
    Active,
}

pub struct OfflineWorker<N: Network, C: CacheStorage> {
    network: N,
    caches: C,
    config: WorkerConfig,
    phase: Phase,
}

impl<N: Network, C: CacheStorage> OfflineWorker<N, C> {
    pub fn new(network: N, caches: C, config: WorkerConfig) -> Self {
        Self {
            network,
            caches,
            config,
            phase: Phase::Installing,
        }
    }

    /// A worker over caches left by an earlier run: active only if every
    /// shell asset is present in the current static cache.
    pub fn resume(network: N, caches: C, config: WorkerConfig) -> Result<Self> {
        let mut installed = true;
        for url in config.asset_urls()? {
            if caches.lookup(&config.static_cache, url.as_str())?.is_none() {
                debug!(url = %url, "shell asset missing from static cache");
                installed = false;
                break;
            }
        }
        let mut w = Self::new(network, caches, config);
        if installed {
            w.phase = Phase::Active;
        }
        Ok(w)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    pub fn caches(&self) -> &C {
        &self.caches
    }

    pub fn network(&self) -> &N {
        &self.network
    }

    /// Download every shell asset into the static cache. All or nothing:
    /// one failed fetch or store leaves the worker installing and the static
    /// cache empty.
    pub fn install(&mut self) -> Result<()> {
        let mut fetched = Vec::new();
        for url in self.config.asset_urls()? {
            let req = Request::get(url);
            let resp = self
                .network
                .fetch(&req)
                .with_context(|| format!("Install: fetch {}", req.url))?;
            if !resp.ok() {
                bail!("Install: {} answered {}", req.url, resp.status);
            }
            fetched.push((req, resp));
        }
        for (req, resp) in &fetched {
            if let Err(e) = self
                .caches
                .put(&self.config.static_cache, req.cache_key(), resp)
            {
                // drop the partial copy
                if let Err(cleanup) = self.caches.delete_cache(&self.config.static_cache) {
                    warn!(error = %cleanup, "could not drop partially filled static cache");
                }
                return Err(e.context(format!("Install: store {}", req.url)));
            }
        }
        info!(cache = %self.config.static_cache, assets = fetched.len(), "shell cached");
        self.phase = Phase::Activating;
        Ok(())
    }

    /// Drop caches from other versions and take control. Returns the names
    /// of the deleted caches.
    pub fn activate(&mut self) -> Result<Vec<String>> {
        if self.phase == Phase::Installing {
            return Err(anyhow!("Cannot activate before install has completed"));
        }
        let mut deleted = Vec::new();
        for name in self.caches.cache_names()? {
            if !self.config.is_current(&name) {
                self.caches.delete_cache(&name)?;
                info!(cache = %name, "deleted stale cache");
                deleted.push(name);
            }
        }
        self.phase = Phase::Active;
        Ok(deleted)
    }

    pub fn handle(&mut self, req: &Request) -> Result<Response> {
        if self.phase != Phase::Active {
            return self.network.fetch(req);
        }
        let r = route(req, &self.config);
        debug!(url = %req.url, route = ?r, "intercepted request");
        match r {
            Route::Passthrough => self.network.fetch(req),
            Route::AiApi => self.network_first(req, false),
            Route::Navigation => self.network_first(req, true),
            Route::StaticAsset => self.cache_first(req),
        }
    }

    fn network_first(&mut self, req: &Request, shell_fallback: bool) -> Result<Response> {
        match self.network.fetch(req) {
            Ok(resp) => {
                if resp.ok() {
                    self.store_dynamic(req, &resp);
                }
                Ok(resp)
            }
            Err(e) => {
                if let Some(hit) = self.caches.match_any(req.cache_key())? {
                    debug!(url = %req.url, "network failed, served from cache");
                    return Ok(hit);
                }
                if shell_fallback {
                    let root = self.config.shell_root()?;
                    if let Some(shell) = self.caches.match_any(root.as_str())? {
                        debug!(url = %req.url, "network failed, served shell document");
                        return Ok(shell);
                    }
                }
                Err(e)
            }
        }
    }

    fn cache_first(&mut self, req: &Request) -> Result<Response> {
        if let Some(hit) = self.caches.match_any(req.cache_key())? {
            return Ok(hit);
        }
        match self.network.fetch(req) {
            Ok(resp) => {
                if resp.ok() {
                    self.store_dynamic(req, &resp);
                }
                Ok(resp)
            }
            Err(e) => self
                .caches
                .match_any(req.cache_key())?
                .ok_or_else(|| e.context(format!("{} is not cached", req.url))),
        }
    }

    fn store_dynamic(&mut self, req: &Request, resp: &Response) {
        if let Err(e) = self
            .caches
            .put(&self.config.dynamic_cache, req.cache_key(), resp)
        {
            warn!(url = %req.url, error = %e, "could not store response in dynamic cache");
        }
    }

    /// Background sync hook. No sync work is registered yet.
    pub fn on_sync(&self, tag: &str) {
        debug!(tag, "background sync event");
    }

    /// Push hook. Notifications are not shown yet.
    pub fn on_push(&self, payload: Option<&str>) {
        debug!(payload = payload.unwrap_or(""), "push event");
    }
}
