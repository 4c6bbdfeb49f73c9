// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::{TimeZone, Utc};
use dompet::kv::SqliteStore;
use dompet::models::{Currency, Transaction, TxType};
use dompet::storage::Persistence;
use dompet::{cli, commands::exporter, db};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde_json::Value;
use tempfile::tempdir;

fn seeded_conn() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    {
        let mut p = Persistence::new(SqliteStore::local(&conn));
        p.save_transaction(Transaction {
            id: "older".into(),
            amount: Decimal::new(1234, 2),
            description: "Corner Shop".into(),
            category: "Groceries".into(),
            date: Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
            r#type: TxType::Expense,
            currency: Currency::Usd,
        });
        p.save_transaction(Transaction {
            id: "newer".into(),
            amount: Decimal::new(5_000_000, 0),
            description: "Gaji, Januari".into(),
            category: "Salary".into(),
            date: Utc.with_ymd_and_hms(2025, 1, 25, 0, 0, 0).unwrap(),
            r#type: TxType::Income,
            currency: Currency::Idr,
        });
    }
    conn
}

fn export(conn: &Connection, format: &str, out: &str) -> anyhow::Result<()> {
    let matches = cli::build_cli().get_matches_from([
        "dompet",
        "export",
        "transactions",
        "--format",
        format,
        "--out",
        out,
    ]);
    let (_, export_m) = matches.subcommand().unwrap();
    exporter::handle(conn, export_m)
}

#[test]
fn export_transactions_as_json_oldest_first() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.json");
    export(&conn, "json", &out_path.to_string_lossy()).unwrap();

    let contents = std::fs::read_to_string(&out_path).unwrap();
    let parsed: Value = serde_json::from_str(&contents).unwrap();
    let arr = parsed.as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["id"], "older");
    assert_eq!(arr[0]["amount"].as_f64(), Some(12.34));
    assert_eq!(arr[0]["type"], "expense");
    assert_eq!(arr[0]["currency"], "USD");
    assert_eq!(arr[1]["id"], "newer");
    assert_eq!(arr[1]["currency"], "IDR");
}

#[test]
fn export_transactions_as_csv() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.csv");
    export(&conn, "csv", &out_path.to_string_lossy()).unwrap();

    let mut rdr = csv::Reader::from_path(&out_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["id", "date", "type", "amount", "currency", "category", "description"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][0], "older");
    assert_eq!(&rows[0][3], "12.34");
    assert_eq!(&rows[1][2], "income");
    assert_eq!(&rows[1][6], "Gaji, Januari");
}

#[test]
fn unknown_format_is_an_error() {
    let conn = seeded_conn();
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("export.xml");
    assert!(export(&conn, "xml", &out_path.to_string_lossy()).is_err());
    assert!(!out_path.exists());
}
