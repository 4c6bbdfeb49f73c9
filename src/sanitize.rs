// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Decoding of stored transaction records.
//!
//! Whatever is in storage (older app versions, hand edits, half-written
//! entries) is turned into a well-formed [`Transaction`]. Each field has one
//! rule: what is accepted as-is and what replaces it otherwise.
//!
//! | field         | accepted                                   | fallback             |
//! |---------------|--------------------------------------------|----------------------|
//! | `id`          | non-blank string, or number kept as text   | fresh UUID v4        |
//! | `amount`      | finite number or numeric string, `>= 0`    | `0`                  |
//! | `description` | non-blank string                           | locale placeholder   |
//! | `category`    | non-blank string                           | locale placeholder   |
//! | `date`        | RFC 3339, or `YYYY-MM-DD` at midnight UTC  | now                  |
//! | `type`        | `"income"` or `"expense"`                  | expense              |
//! | `currency`    | `IDR`, `USD` or `EUR`                      | primary currency     |

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::i18n::{t, Text};
use crate::models::{Currency, Language, Transaction, TxType};

/// Inputs the fallbacks depend on.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext {
    pub language: Language,
    pub now: DateTime<Utc>,
    pub primary: Currency,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub tx: Transaction,
    /// Names of the fields that fell back to their default.
    pub defaulted: Vec<&'static str>,
}

pub struct Rule<T> {
    pub field: &'static str,
    pub accept: fn(&Value) -> Option<T>,
    pub fallback: fn(&DecodeContext) -> T,
}

pub const ID: Rule<String> = Rule {
    field: "id",
    accept: accept_id,
    fallback: fresh_id,
};
pub const AMOUNT: Rule<Decimal> = Rule {
    field: "amount",
    accept: accept_amount,
    fallback: zero_amount,
};
pub const DESCRIPTION: Rule<String> = Rule {
    field: "description",
    accept: accept_text,
    fallback: placeholder_description,
};
pub const CATEGORY: Rule<String> = Rule {
    field: "category",
    accept: accept_text,
    fallback: placeholder_category,
};
pub const DATE: Rule<DateTime<Utc>> = Rule {
    field: "date",
    accept: accept_date,
    fallback: current_time,
};
pub const TYPE: Rule<TxType> = Rule {
    field: "type",
    accept: accept_type,
    fallback: expense,
};
pub const CURRENCY: Rule<Currency> = Rule {
    field: "currency",
    accept: accept_currency,
    fallback: primary_currency,
};

fn accept_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        // older records used millisecond timestamps as ids
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn accept_amount(v: &Value) -> Option<Decimal> {
    let parsed = match v {
        Value::Number(n) => {
            let s = n.to_string();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(&s).ok())
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).and_then(|f| Decimal::try_from(f).ok()))
        }
        Value::String(s) => {
            let s = s.trim();
            s.parse::<Decimal>()
                .ok()
                .or_else(|| Decimal::from_scientific(s).ok())
        }
        _ => None,
    };
    parsed.filter(|d| !d.is_sign_negative() || d.is_zero())
}

fn accept_text(v: &Value) -> Option<String> {
    v.as_str().filter(|s| !s.trim().is_empty()).map(str::to_string)
}

fn accept_date(v: &Value) -> Option<DateTime<Utc>> {
    let s = v.as_str()?.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn accept_type(v: &Value) -> Option<TxType> {
    match v.as_str()? {
        "income" => Some(TxType::Income),
        "expense" => Some(TxType::Expense),
        _ => None,
    }
}

fn accept_currency(v: &Value) -> Option<Currency> {
    match v.as_str()? {
        "IDR" => Some(Currency::Idr),
        "USD" => Some(Currency::Usd),
        "EUR" => Some(Currency::Eur),
        _ => None,
    }
}

fn fresh_id(_: &DecodeContext) -> String {
    Uuid::new_v4().to_string()
}

fn zero_amount(_: &DecodeContext) -> Decimal {
    Decimal::ZERO
}

fn placeholder_description(ctx: &DecodeContext) -> String {
    t(ctx.language, Text::NoDescription).to_string()
}

fn placeholder_category(ctx: &DecodeContext) -> String {
    t(ctx.language, Text::Uncategorized).to_string()
}

fn current_time(ctx: &DecodeContext) -> DateTime<Utc> {
    ctx.now
}

fn expense(_: &DecodeContext) -> TxType {
    TxType::Expense
}

fn primary_currency(ctx: &DecodeContext) -> Currency {
    ctx.primary
}

fn take<T>(
    obj: Option<&Map<String, Value>>,
    rule: &Rule<T>,
    ctx: &DecodeContext,
    defaulted: &mut Vec<&'static str>,
) -> T {
    match obj.and_then(|o| o.get(rule.field)).and_then(rule.accept) {
        Some(v) => v,
        None => {
            defaulted.push(rule.field);
            (rule.fallback)(ctx)
        }
    }
}

/// Decode one stored entry. Never fails: a non-object decodes as if every
/// field were missing.
pub fn decode_transaction(raw: &Value, ctx: &DecodeContext) -> Decoded {
    let obj = raw.as_object();
    let mut defaulted = Vec::new();
    let tx = Transaction {
        id: take(obj, &ID, ctx, &mut defaulted),
        amount: take(obj, &AMOUNT, ctx, &mut defaulted),
        description: take(obj, &DESCRIPTION, ctx, &mut defaulted),
        category: take(obj, &CATEGORY, ctx, &mut defaulted),
        date: take(obj, &DATE, ctx, &mut defaulted),
        r#type: take(obj, &TYPE, ctx, &mut defaulted),
        currency: take(obj, &CURRENCY, ctx, &mut defaulted),
    };
    Decoded { tx, defaulted }
}

/// Decode a stored list. Anything other than a JSON array is an empty list.
pub fn decode_transactions(raw: &Value, ctx: &DecodeContext) -> Vec<Decoded> {
    match raw.as_array() {
        Some(items) => items.iter().map(|v| decode_transaction(v, ctx)).collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn ctx() -> DecodeContext {
        DecodeContext {
            language: Language::En,
            now: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
            primary: Currency::Idr,
        }
    }

    #[test]
    fn well_formed_entry_is_untouched() {
        let raw = json!({
            "id": "t1",
            "amount": 12.5,
            "description": "Coffee",
            "category": "Food",
            "date": "2025-02-10T08:30:00.000Z",
            "type": "expense",
            "currency": "USD"
        });
        let d = decode_transaction(&raw, &ctx());
        assert!(d.defaulted.is_empty());
        assert_eq!(d.tx.id, "t1");
        assert_eq!(d.tx.amount, Decimal::new(125, 1));
        assert_eq!(d.tx.currency, Currency::Usd);
        assert_eq!(d.tx.date, Utc.with_ymd_and_hms(2025, 2, 10, 8, 30, 0).unwrap());
    }

    #[test]
    fn empty_object_takes_every_fallback() {
        let d = decode_transaction(&json!({}), &ctx());
        assert_eq!(
            d.defaulted,
            vec!["id", "amount", "description", "category", "date", "type", "currency"]
        );
        assert!(Uuid::parse_str(&d.tx.id).is_ok());
        assert_eq!(d.tx.amount, Decimal::ZERO);
        assert_eq!(d.tx.description, "No description");
        assert_eq!(d.tx.category, "Other");
        assert_eq!(d.tx.date, ctx().now);
        assert_eq!(d.tx.r#type, TxType::Expense);
        assert_eq!(d.tx.currency, Currency::Idr);
    }

    #[test]
    fn type_is_income_only_for_exact_tag() {
        let d = decode_transaction(&json!({"type": "Income"}), &ctx());
        assert_eq!(d.tx.r#type, TxType::Expense);
        let d = decode_transaction(&json!({"type": "income"}), &ctx());
        assert_eq!(d.tx.r#type, TxType::Income);
    }

    #[test]
    fn amount_accepts_numeric_strings_and_rejects_negatives() {
        let d = decode_transaction(&json!({"amount": "15000"}), &ctx());
        assert_eq!(d.tx.amount, Decimal::new(15000, 0));
        let d = decode_transaction(&json!({"amount": -3}), &ctx());
        assert_eq!(d.tx.amount, Decimal::ZERO);
        let d = decode_transaction(&json!({"amount": "abc"}), &ctx());
        assert_eq!(d.tx.amount, Decimal::ZERO);
    }

    #[test]
    fn plain_date_is_midnight_utc() {
        let d = decode_transaction(&json!({"date": "2024-12-31"}), &ctx());
        assert_eq!(d.tx.date, Utc.with_ymd_and_hms(2024, 12, 31, 0, 0, 0).unwrap());
    }

    #[test]
    fn non_array_decodes_to_nothing() {
        assert!(decode_transactions(&json!({"id": "x"}), &ctx()).is_empty());
        assert_eq!(decode_transactions(&json!([1, "two"]), &ctx()).len(), 2);
    }

    #[test]
    fn numeric_id_is_kept_as_text() {
        let d = decode_transaction(&json!({"id": 1712345678901u64}), &ctx());
        assert_eq!(d.tx.id, "1712345678901");
        assert!(!d.defaulted.contains(&"id"));
        let d = decode_transaction(&json!({"id": "  "}), &ctx());
        assert!(d.defaulted.contains(&"id"));
    }

    #[test]
    fn blank_text_counts_as_missing() {
        let d = decode_transaction(&json!({"description": "   ", "category": ""}), &ctx());
        assert_eq!(d.tx.description, "No description");
        assert_eq!(d.tx.category, "Other");
        assert!(d.defaulted.contains(&"description"));
        assert!(d.defaulted.contains(&"category"));
    }
}
