// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use dompet::models::{Currency, RateTable, Transaction, TxType};
use dompet::rates::fallback_rates;
use dompet::report::summarize;
use dompet::utils::{fmt_money, fx_convert};
use rust_decimal::Decimal;

fn usd_table() -> RateTable {
    RateTable::from([
        ("USD".to_string(), Decimal::ONE),
        ("EUR".to_string(), Decimal::new(92, 2)),
    ])
}

#[test]
fn fx_normalizes_into_base_then_projects() {
    let rates = usd_table();
    let res = fx_convert(Decimal::new(100, 0), Currency::Eur, Currency::Usd, Some(&rates));
    // 100 / 0.92 * 1
    assert!(!res.missing_rate);
    assert_eq!(res.amount.round_dp(2), Decimal::new(10870, 2));

    let back = fx_convert(res.amount, Currency::Usd, Currency::Eur, Some(&rates));
    assert_eq!(back.amount.round_dp(2), Decimal::new(10000, 2));
}

#[test]
fn same_currency_is_identity_even_without_rates() {
    let amt = Decimal::new(123456, 2);
    for c in Currency::ALL {
        assert_eq!(fx_convert(amt, c, c, None).amount, amt);
        assert_eq!(fx_convert(amt, c, c, Some(&RateTable::new())).amount, amt);
    }
}

#[test]
fn missing_rate_returns_original_amount_with_flag() {
    let rates = usd_table();
    let res = fx_convert(Decimal::new(50000, 0), Currency::Idr, Currency::Usd, Some(&rates));
    assert!(res.missing_rate);
    assert_eq!(res.amount, Decimal::new(50000, 0));
}

#[test]
fn rates_not_loaded_yet_show_zero() {
    let res = fx_convert(Decimal::new(10, 0), Currency::Eur, Currency::Idr, None);
    assert!(!res.missing_rate);
    assert_eq!(res.amount, Decimal::ZERO);
}

#[test]
fn money_formatting_per_currency() {
    assert_eq!(fmt_money(&Decimal::new(1500000, 0), Currency::Idr), "Rp 1.500.000");
    assert_eq!(fmt_money(&Decimal::new(123450, 2), Currency::Usd), "$1,234.50");
    assert_eq!(fmt_money(&Decimal::new(12, 0), Currency::Eur), "€12.00");
    assert_eq!(fmt_money(&Decimal::new(-999, 0), Currency::Idr), "-Rp 999");
}

#[test]
fn summary_converts_into_display_currency() {
    let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let mk = |id: &str, amount: Decimal, ccy, kind, cat: &str| Transaction {
        id: id.into(),
        amount,
        description: id.into(),
        category: cat.into(),
        date,
        r#type: kind,
        currency: ccy,
    };
    let txs = vec![
        mk("salary", Decimal::new(1000, 0), Currency::Usd, TxType::Income, "Salary"),
        mk("food", Decimal::new(92, 0), Currency::Eur, TxType::Expense, "Food"),
        mk("rent", Decimal::new(300, 0), Currency::Usd, TxType::Expense, "Housing"),
        mk("snack", Decimal::new(5000, 0), Currency::Idr, TxType::Expense, "Food"),
    ];
    let s = summarize(&txs, Currency::Usd, Some(&usd_table()));
    // IDR has no rate: counted as-is and flagged
    assert_eq!(s.unconverted, 1);
    assert_eq!(s.income, Decimal::new(1000, 0));
    assert_eq!(s.expense.round_dp(2), Decimal::new(5400, 0));
    assert_eq!(s.balance.round_dp(2), Decimal::new(-4400, 0));
    assert_eq!(s.by_category[0].category, "Food");
    assert_eq!(s.by_category[1].category, "Housing");
    assert_eq!(s.count, 4);
}

#[test]
fn overflowing_conversion_keeps_the_original_amount() {
    // a 26-digit amount passes form validation
    let huge: Decimal = "10000000000000000000000000".parse().unwrap();
    let rates = fallback_rates(Currency::Idr);
    let res = fx_convert(huge, Currency::Usd, Currency::Idr, Some(&rates));
    assert!(res.missing_rate);
    assert_eq!(res.amount, huge);

    // the same amount still converts downwards
    let res = fx_convert(huge, Currency::Idr, Currency::Usd, Some(&rates));
    assert!(!res.missing_rate);
    assert_eq!(res.amount.round_dp(0), "625000000000000000000".parse::<Decimal>().unwrap());
}

#[test]
fn summary_totals_saturate_instead_of_overflowing() {
    let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let big = |id: &str, kind| Transaction {
        id: id.into(),
        amount: Decimal::MAX,
        description: id.into(),
        category: "Huge".into(),
        date,
        r#type: kind,
        currency: Currency::Idr,
    };
    let txs = vec![
        big("a", TxType::Expense),
        big("b", TxType::Expense),
        big("c", TxType::Expense),
    ];
    let s = summarize(&txs, Currency::Idr, None);
    assert_eq!(s.expense, Decimal::MAX);
    assert_eq!(s.balance, Decimal::MIN);
    assert_eq!(s.by_category[0].amount, Decimal::MAX);
    assert_eq!(s.by_category[0].share, Decimal::ONE_HUNDRED);
    assert!(!fmt_money(&s.balance, Currency::Idr).is_empty());
}
