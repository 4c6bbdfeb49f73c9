// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::RefCell;

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use dompet::i18n::{t, Text};
use dompet::insight::{build_prompt, generate_insight, InsightModel, RECENT_LIMIT};
use dompet::models::{AppSettings, Currency, Language, Transaction, TxType};
use rust_decimal::Decimal;

/// Records the prompt and answers with a canned reply or an error.
struct FakeModel {
    reply: Option<String>,
    prompts: RefCell<Vec<String>>,
}

impl FakeModel {
    fn answering(text: &str) -> Self {
        Self {
            reply: Some(text.to_string()),
            prompts: RefCell::new(Vec::new()),
        }
    }

    fn failing() -> Self {
        Self {
            reply: None,
            prompts: RefCell::new(Vec::new()),
        }
    }
}

impl InsightModel for FakeModel {
    fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.borrow_mut().push(prompt.to_string());
        self.reply.clone().ok_or_else(|| anyhow!("quota exceeded"))
    }
}

fn sample() -> Vec<Transaction> {
    let date = Utc.with_ymd_and_hms(2025, 3, 10, 8, 0, 0).unwrap();
    vec![
        Transaction {
            id: "1".into(),
            amount: Decimal::new(75_000, 0),
            description: "Nasi goreng".into(),
            category: "Food".into(),
            date,
            r#type: TxType::Expense,
            currency: Currency::Idr,
        },
        Transaction {
            id: "2".into(),
            amount: Decimal::new(5_000_000, 0),
            description: "Gaji".into(),
            category: "Salary".into(),
            date,
            r#type: TxType::Income,
            currency: Currency::Idr,
        },
    ]
}

fn english() -> AppSettings {
    AppSettings {
        language: Language::En,
        username: "Sari".into(),
        ..AppSettings::default()
    }
}

#[test]
fn model_reply_is_trimmed_and_returned() {
    let model = FakeModel::answering("  Spend less on snacks.\n");
    let out = generate_insight(Some(&model), &sample(), &english(), None);
    assert_eq!(out, "Spend less on snacks.");
    assert_eq!(model.prompts.borrow().len(), 1);
}

#[test]
fn failures_become_localized_text() {
    let model = FakeModel::failing();
    let out = generate_insight(Some(&model), &sample(), &english(), None);
    assert_eq!(out, t(Language::En, Text::InsightFailed));

    let out = generate_insight(Some(&model), &sample(), &AppSettings::default(), None);
    assert_eq!(out, t(Language::Id, Text::InsightFailed));
}

#[test]
fn missing_key_and_empty_history_skip_the_model() {
    let out = generate_insight(None, &sample(), &english(), None);
    assert_eq!(out, t(Language::En, Text::InsightMissingKey));

    let model = FakeModel::answering("unused");
    let out = generate_insight(Some(&model), &[], &english(), None);
    assert_eq!(out, t(Language::En, Text::InsightNoData));
    assert!(model.prompts.borrow().is_empty());
}

#[test]
fn prompt_carries_role_task_and_data() {
    let prompt = build_prompt(&sample(), &english(), None);
    assert!(prompt.starts_with("ROLE: "));
    assert!(prompt.contains("Answer in English. Address the user as Sari."));
    assert!(prompt.contains("DATA (amounts in IDR):"));
    assert!(prompt.contains("- Income: Rp 5.000.000"));
    assert!(prompt.contains("- Expense: Rp 75.000"));
    assert!(prompt.contains("Nasi goreng -Rp 75.000 (Food)"));
    assert!(prompt.contains("Gaji +Rp 5.000.000 (Salary)"));

    let id_prompt = build_prompt(&sample(), &AppSettings::default(), None);
    assert!(id_prompt.contains("Answer in Bahasa Indonesia."));
}

#[test]
fn prompt_lists_only_recent_transactions() {
    let base = sample()[0].clone();
    let many: Vec<Transaction> = (0..RECENT_LIMIT + 10)
        .map(|i| Transaction {
            id: i.to_string(),
            description: format!("item-{:03}", i),
            ..base.clone()
        })
        .collect();
    let prompt = build_prompt(&many, &english(), None);
    assert!(prompt.contains("item-000"));
    assert!(prompt.contains(&format!("item-{:03}", RECENT_LIMIT - 1)));
    assert!(!prompt.contains(&format!("item-{:03}", RECENT_LIMIT)));
}
