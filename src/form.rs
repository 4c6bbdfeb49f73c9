// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Validation of the new-transaction form.

use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Transaction, TransactionDraft};

pub const MAX_DESCRIPTION_LEN: usize = 100;

static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+(\.\d{1,2})?$").expect("static amount pattern")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("amount is required")]
    AmountMissing,
    #[error("amount must be a plain number with at most two decimals")]
    AmountFormat,
    #[error("amount must be greater than zero")]
    AmountNotPositive,
    #[error("description is required")]
    DescriptionMissing,
    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("category is required")]
    CategoryMissing,
    #[error("date must be YYYY-MM-DD")]
    DateFormat,
}

impl FieldError {
    pub fn field(&self) -> &'static str {
        match self {
            FieldError::AmountMissing | FieldError::AmountFormat | FieldError::AmountNotPositive => {
                "amount"
            }
            FieldError::DescriptionMissing | FieldError::DescriptionTooLong { .. } => "description",
            FieldError::CategoryMissing => "category",
            FieldError::DateFormat => "date",
        }
    }
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field(), e))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transaction ({})", describe(.0))]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn for_field(&self, field: &str) -> Vec<&FieldError> {
        self.0.iter().filter(|e| e.field() == field).collect()
    }
}

fn check_amount(raw: &str) -> Result<Decimal, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::AmountMissing);
    }
    if !AMOUNT_RE.is_match(raw) {
        return Err(FieldError::AmountFormat);
    }
    let amount = raw.parse::<Decimal>().map_err(|_| FieldError::AmountFormat)?;
    if amount <= Decimal::ZERO {
        return Err(FieldError::AmountNotPositive);
    }
    Ok(amount)
}

/// Check every field and build the transaction to save. All problems are
/// reported together, keyed by field.
pub fn validate_draft(draft: &TransactionDraft, now: DateTime<Utc>) -> Result<Transaction, FormErrors> {
    let mut errors = Vec::new();

    let amount = check_amount(&draft.amount).map_err(|e| errors.push(e)).ok();

    let description = draft.description.trim();
    if description.is_empty() {
        errors.push(FieldError::DescriptionMissing);
    } else if description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(FieldError::DescriptionTooLong {
            max: MAX_DESCRIPTION_LEN,
        });
    }

    let category = draft.category.trim();
    if category.is_empty() {
        errors.push(FieldError::CategoryMissing);
    }

    let date = match draft.date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => Some(now),
        Some(s) => match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            Ok(d) => Some(d.and_time(now.time()).and_utc()),
            Err(_) => {
                errors.push(FieldError::DateFormat);
                None
            }
        },
    };

    match (amount, date) {
        (Some(amount), Some(date)) if errors.is_empty() => Ok(Transaction {
            id: Uuid::new_v4().to_string(),
            amount,
            description: description.to_string(),
            category: category.to_string(),
            date,
            r#type: draft.r#type,
            currency: draft.currency,
        }),
        _ => Err(FormErrors(errors)),
    }
}
