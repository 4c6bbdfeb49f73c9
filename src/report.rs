// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Currency, RateTable, Transaction, TxType};
use crate::utils::fx_convert;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub amount: Decimal,
    pub share: Decimal, // percent of total expense
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub currency: Currency,
    pub income: Decimal,
    pub expense: Decimal,
    pub balance: Decimal,
    pub count: usize,
    /// Transactions counted in their own currency because a rate was missing.
    pub unconverted: usize,
    pub by_category: Vec<CategoryTotal>,
}

/// Display amount of one transaction in `display`.
pub fn display_amount(tx: &Transaction, display: Currency, rates: Option<&RateTable>) -> Decimal {
    fx_convert(tx.amount, tx.currency, display, rates).amount
}

/// Totals and expense breakdown in the display currency. Categories are
/// sorted by amount, largest first.
pub fn summarize(txs: &[Transaction], display: Currency, rates: Option<&RateTable>) -> Summary {
    let mut income = Decimal::ZERO;
    let mut expense = Decimal::ZERO;
    let mut unconverted = 0;
    let mut agg: HashMap<&str, Decimal> = HashMap::new();

    for tx in txs {
        let c = fx_convert(tx.amount, tx.currency, display, rates);
        if c.missing_rate {
            unconverted += 1;
        }
        // totals saturate at the Decimal bounds
        match tx.r#type {
            TxType::Income => income = income.saturating_add(c.amount),
            TxType::Expense => {
                expense = expense.saturating_add(c.amount);
                let slot = agg.entry(tx.category.as_str()).or_insert(Decimal::ZERO);
                *slot = slot.saturating_add(c.amount);
            }
        }
    }

    let mut by_category: Vec<CategoryTotal> = agg
        .into_iter()
        .map(|(cat, amount)| CategoryTotal {
            category: cat.to_string(),
            amount,
            share: if expense.is_zero() {
                Decimal::ZERO
            } else {
                (amount / expense * Decimal::ONE_HUNDRED).round_dp(1)
            },
        })
        .collect();
    by_category.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| a.category.cmp(&b.category)));

    Summary {
        currency: display,
        income,
        expense,
        balance: income.saturating_sub(expense),
        count: txs.len(),
        unconverted,
        by_category,
    }
}
