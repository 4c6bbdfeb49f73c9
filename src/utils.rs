// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;
use tracing::warn;

use crate::models::{Currency, RateTable};

const UA: &str = concat!(
    "dompet/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/dompet)"
);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(15))
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// Wall-clock source, injected wherever expiry or "now" defaults matter.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;

    fn now_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> DateTime<Utc> {
        (**self).now()
    }
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

fn group_digits(int_part: &str, sep: char) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(ch);
    }
    out
}

/// Display form of an amount: `Rp 1.500.000`, `$1,234.50`, `€12.00`.
pub fn fmt_money(d: &Decimal, ccy: Currency) -> String {
    let sign = if d.is_sign_negative() && !d.is_zero() { "-" } else { "" };
    let abs = d.abs();
    match ccy {
        Currency::Idr => {
            let whole = abs.round_dp(0).to_string();
            format!("{}Rp {}", sign, group_digits(&whole, '.'))
        }
        Currency::Usd | Currency::Eur => {
            let s = format!("{:.2}", abs.round_dp(2));
            let (int_part, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
            let symbol = if ccy == Currency::Usd { "$" } else { "€" };
            format!("{}{}{}.{}", sign, symbol, group_digits(int_part, ','), frac)
        }
    }
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Converted {
    pub amount: Decimal,
    /// Set when a rate was missing and `amount` is the unconverted input.
    pub missing_rate: bool,
}

/// Convert `amount` from `from_ccy` to `to_ccy` through a rate table whose
/// values are all relative to one base: normalize into the base, then
/// project into the target.
///
/// `rates == None` means no table has arrived yet; anything that would need
/// one shows a provisional zero until it does.
pub fn fx_convert(
    amount: Decimal,
    from_ccy: Currency,
    to_ccy: Currency,
    rates: Option<&RateTable>,
) -> Converted {
    if from_ccy == to_ccy {
        return Converted {
            amount,
            missing_rate: false,
        };
    }
    let Some(rates) = rates else {
        return Converted {
            amount: Decimal::ZERO,
            missing_rate: false,
        };
    };
    let from_rate = rates.get(from_ccy.code()).filter(|r| !r.is_zero());
    let to_rate = rates.get(to_ccy.code());
    match (from_rate, to_rate) {
        (Some(f), Some(t)) => match amount.checked_div(*f).and_then(|base| base.checked_mul(*t)) {
            Some(converted) => Converted {
                amount: converted,
                missing_rate: false,
            },
            None => {
                warn!(from = %from_ccy, to = %to_ccy, %amount, "conversion overflowed, showing unconverted amount");
                Converted {
                    amount,
                    missing_rate: true,
                }
            }
        },
        _ => {
            warn!(from = %from_ccy, to = %to_ccy, "missing exchange rate, showing unconverted amount");
            Converted {
                amount,
                missing_rate: true,
            }
        }
    }
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}
