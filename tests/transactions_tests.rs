// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::ArgMatches;
use dompet::config::Config;
use dompet::kv::SqliteStore;
use dompet::models::{Currency, TxType};
use dompet::storage::Persistence;
use dompet::{cli, commands::draft, commands::transactions, db};
use rusqlite::Connection;

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn
}

fn cfg() -> Config {
    Config::from_lookup(|_| None).unwrap()
}

fn tx_matches(args: &[&str]) -> ArgMatches {
    let mut argv = vec!["dompet", "tx"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().get_matches_from(argv);
    match matches.subcommand() {
        Some(("tx", tx_m)) => tx_m.clone(),
        _ => panic!("no tx subcommand"),
    }
}

fn run(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    transactions::handle(conn, &cfg(), &tx_matches(args))
}

fn add(conn: &Connection, amount: &str, desc: &str, kind: &str, date: &str) {
    run(
        conn,
        &[
            "add",
            "--amount",
            amount,
            "--description",
            desc,
            "--category",
            "Food",
            "--type",
            kind,
            "--date",
            date,
        ],
    )
    .unwrap();
}

fn stored(conn: &Connection) -> Vec<dompet::models::Transaction> {
    Persistence::new(SqliteStore::local(conn)).get_transactions()
}

#[test]
fn add_records_newest_first_in_settings_currency() {
    let conn = setup();
    add(&conn, "12.50", "Lunch", "expense", "2025-01-01");
    add(&conn, "1000", "Salary", "income", "2025-01-02");

    let txs = stored(&conn);
    assert_eq!(txs.len(), 2);
    assert_eq!(txs[0].description, "Salary");
    assert_eq!(txs[0].r#type, TxType::Income);
    assert_eq!(txs[1].amount, rust_decimal::Decimal::new(125, 1));
    assert_eq!(txs[1].currency, Currency::Idr);
    assert_eq!(txs[1].date.format("%Y-%m-%d").to_string(), "2025-01-01");
}

#[test]
fn list_limit_and_type_respected() {
    let conn = setup();
    for i in 1..=3 {
        add(&conn, "10", &format!("E{}", i), "expense", &format!("2025-01-0{}", i));
    }
    add(&conn, "99", "Gift", "income", "2025-01-04");

    let list_m = tx_matches(&["list", "--limit", "2"]);
    if let Some(("list", sub)) = list_m.subcommand() {
        let rows = transactions::query_rows(&conn, sub).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].description, "Gift");
    } else {
        panic!("no list subcommand");
    }

    let list_m = tx_matches(&["list", "--type", "expense"]);
    if let Some(("list", sub)) = list_m.subcommand() {
        let rows = transactions::query_rows(&conn, sub).unwrap();
        assert_eq!(
            rows.iter().map(|t| t.description.as_str()).collect::<Vec<_>>(),
            vec!["E3", "E2", "E1"]
        );
    } else {
        panic!("no list subcommand");
    }
}

#[test]
fn rm_accepts_several_ids() {
    let conn = setup();
    add(&conn, "1", "A", "expense", "2025-01-01");
    add(&conn, "2", "B", "expense", "2025-01-02");
    add(&conn, "3", "C", "expense", "2025-01-03");
    let ids: Vec<String> = stored(&conn).iter().map(|t| t.id.clone()).collect();

    run(&conn, &["rm", &ids[0], &ids[2]]).unwrap();
    let left = stored(&conn);
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].description, "B");

    run(&conn, &["rm", &ids[1]]).unwrap();
    assert!(stored(&conn).is_empty());
}

#[test]
fn clear_requires_confirmation() {
    let conn = setup();
    add(&conn, "5", "Coffee", "expense", "2025-01-01");

    assert!(run(&conn, &["clear"]).is_err());
    assert_eq!(stored(&conn).len(), 1);

    run(&conn, &["clear", "--yes"]).unwrap();
    assert!(stored(&conn).is_empty());
}

#[test]
fn invalid_amount_is_rejected_and_nothing_saved() {
    let conn = setup();
    for bad in ["5,00", "1.234", "abc", "0"] {
        let res = run(
            &conn,
            &["add", "--amount", bad, "--description", "X", "--category", "Food"],
        );
        assert!(res.is_err(), "accepted {}", bad);
    }
    assert!(stored(&conn).is_empty());
}

#[test]
fn draft_commit_saves_and_clears_the_draft() {
    let conn = setup();
    let matches = cli::build_cli().get_matches_from([
        "dompet",
        "draft",
        "set",
        "--amount",
        "42",
        "--description",
        "Groceries",
        "--category",
        "Food",
        "--currency",
        "USD",
    ]);
    let (_, draft_m) = matches.subcommand().unwrap();
    draft::handle(&conn, draft_m).unwrap();
    assert!(Persistence::new(SqliteStore::local(&conn)).get_draft().is_some());

    let matches = cli::build_cli().get_matches_from(["dompet", "draft", "commit"]);
    let (_, draft_m) = matches.subcommand().unwrap();
    draft::handle(&conn, draft_m).unwrap();

    let txs = stored(&conn);
    assert_eq!(txs.len(), 1);
    assert_eq!(txs[0].currency, Currency::Usd);
    assert!(Persistence::new(SqliteStore::local(&conn)).get_draft().is_none());
}
