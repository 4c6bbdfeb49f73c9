// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! AI spending summary: prompt construction and the Gemini call.

use std::fmt::Write as _;

use anyhow::{anyhow, Context, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::i18n::{t, Text};
use crate::models::{AppSettings, Language, RateTable, Transaction, TxType};
use crate::report::{display_amount, summarize};
use crate::utils::{fmt_money, http_client};

/// How many of the newest transactions are listed line by line.
pub const RECENT_LIMIT: usize = 30;

pub trait InsightModel {
    fn generate(&self, prompt: &str) -> Result<String>;
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: &str, model: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            client: http_client()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl InsightModel for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = json!({ "contents": [{ "parts": [{ "text": prompt }] }] });
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .with_context(|| format!("POST {}", url))?
            .error_for_status()?;
        let parsed: GenerateResponse = resp.json().context("Decode generateContent response")?;
        parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| anyhow!("Model returned no text"))
    }
}

/// Role, task and data sections for the model, in the user's language and
/// display currency.
pub fn build_prompt(txs: &[Transaction], settings: &AppSettings, rates: Option<&RateTable>) -> String {
    let ccy = settings.currency;
    let summary = summarize(txs, ccy, rates);
    let mut p = String::new();

    let (role, task, lang_name) = match settings.language {
        Language::En => (
            "You are a friendly personal finance assistant.",
            "Summarize this user's spending in at most five short bullet points, point out the largest categories, and give one practical saving tip.",
            "English",
        ),
        Language::Id => (
            "Kamu adalah asisten keuangan pribadi yang ramah.",
            "Ringkas pengeluaran pengguna ini dalam maksimal lima poin singkat, sebutkan kategori terbesar, dan beri satu tips hemat yang praktis.",
            "Bahasa Indonesia",
        ),
    };

    let _ = writeln!(p, "ROLE: {}", role);
    let _ = writeln!(p, "TASK: {} Answer in {}. Address the user as {}.", task, lang_name, settings.username);
    let _ = writeln!(p, "DATA (amounts in {}):", ccy);
    let _ = writeln!(p, "- {}: {}", t(Language::En, Text::Income), fmt_money(&summary.income, ccy));
    let _ = writeln!(p, "- {}: {}", t(Language::En, Text::Expense), fmt_money(&summary.expense, ccy));
    let _ = writeln!(p, "- {}: {}", t(Language::En, Text::Balance), fmt_money(&summary.balance, ccy));
    let _ = writeln!(p, "- Expense by category:");
    for c in &summary.by_category {
        let _ = writeln!(p, "  - {}: {} ({}%)", c.category, fmt_money(&c.amount, ccy), c.share);
    }
    let _ = writeln!(p, "- Recent transactions:");
    for tx in txs.iter().take(RECENT_LIMIT) {
        let sign = if tx.r#type == TxType::Income { "+" } else { "-" };
        let _ = writeln!(
            p,
            "  - {} {} {}{} ({})",
            tx.date.format("%Y-%m-%d"),
            tx.description,
            sign,
            fmt_money(&display_amount(tx, ccy, rates), ccy),
            tx.category
        );
    }
    p
}

/// Text to show in place of the insight. Failures become a localized
/// message rather than an error.
pub fn generate_insight(
    model: Option<&dyn InsightModel>,
    txs: &[Transaction],
    settings: &AppSettings,
    rates: Option<&RateTable>,
) -> String {
    let lang = settings.language;
    if txs.is_empty() {
        return t(lang, Text::InsightNoData).to_string();
    }
    let Some(model) = model else {
        return t(lang, Text::InsightMissingKey).to_string();
    };
    let prompt = build_prompt(txs, settings, rates);
    match model.generate(&prompt) {
        Ok(text) => {
            info!(chars = text.len(), "insight generated");
            text.trim().to_string()
        }
        Err(e) => {
            warn!(error = %e, "insight request failed");
            t(lang, Text::InsightFailed).to_string()
        }
    }
}
