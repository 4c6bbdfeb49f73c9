// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;

pub const DEFAULT_RATES_URL: &str = "https://api.frankfurter.app";
pub const DEFAULT_GEMINI_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ORIGIN: &str = "http://localhost:5173";

/// API key baked in at build time, if the build environment provided one.
const BUILD_GEMINI_KEY: Option<&str> = option_env!("DOMPET_GEMINI_API_KEY");

#[derive(Debug, Clone)]
pub struct Config {
    pub db_path: Option<PathBuf>,
    pub rates_url: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_url: String,
    pub origin: Url,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    /// Build from any variable source; empty values count as unset.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self> {
        let get = |k: &str| lookup(k).filter(|v| !v.trim().is_empty());
        let origin_raw = get("DOMPET_ORIGIN").unwrap_or_else(|| DEFAULT_ORIGIN.to_string());
        let origin = Url::parse(&origin_raw)
            .with_context(|| format!("Invalid DOMPET_ORIGIN '{}'", origin_raw))?;
        Ok(Self {
            db_path: get("DOMPET_DB").map(PathBuf::from),
            rates_url: get("DOMPET_RATES_URL").unwrap_or_else(|| DEFAULT_RATES_URL.to_string()),
            gemini_api_key: get("DOMPET_GEMINI_API_KEY")
                .or_else(|| BUILD_GEMINI_KEY.map(str::to_string)),
            gemini_model: get("DOMPET_GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_url: get("DOMPET_GEMINI_URL").unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string()),
            origin,
        })
    }
}
