// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{NaiveDate, Utc};
use pocketledger::analysis::{AnalysisClient, AnalysisRequest, UnconfiguredAnalysis, chat_text};
use pocketledger::app::{App, Collaborators};
use pocketledger::bucket::Bucketer;
use pocketledger::chart::{ChartPoint, ChartRenderer, NoChart, TextBarChart};
use pocketledger::commands::{calendar, exporter, transactions};
use pocketledger::config::Config;
use pocketledger::errors::{AnalysisError, EntryError, RateFetchError, StoreError, ValidationError};
use pocketledger::fx::RateSource;
use pocketledger::ledger::LedgerService;
use pocketledger::models::{NewTransaction, Transaction, TxType};
use pocketledger::money::{AmountInput, DisplayCurrency};
use pocketledger::prefs::PreferenceStore;
use pocketledger::store::{RecordStore, SqliteStore};
use pocketledger::{cli, db};
use rusqlite::params;
use rust_decimal::Decimal;
use tempfile::tempdir;

struct FixedRate(f64);

impl RateSource for FixedRate {
    fn fetch_usd_krw(&self) -> Result<f64, RateFetchError> {
        Ok(self.0)
    }
}

struct CountingRate(Rc<Cell<usize>>);

impl RateSource for CountingRate {
    fn fetch_usd_krw(&self) -> Result<f64, RateFetchError> {
        self.0.set(self.0.get() + 1);
        Ok(1300.0)
    }
}

/// Every call fails the way a dropped connection would.
struct DownStore;

impl RecordStore for DownStore {
    fn list(&self) -> Result<Vec<Transaction>, StoreError> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }
    fn insert(&self, _new: &NewTransaction) -> Result<Transaction, StoreError> {
        Err(StoreError::Status {
            status: 503,
            body: "unavailable".into(),
        })
    }
    fn delete(&self, id: i64) -> Result<(), StoreError> {
        Err(StoreError::NotFound(id))
    }
}

struct RecordingAnalysis(Rc<RefCell<Option<AnalysisRequest>>>);

impl AnalysisClient for RecordingAnalysis {
    fn analyze(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        *self.0.borrow_mut() = Some(request.clone());
        Ok("You spent mostly on food.".into())
    }
}

fn seeded_store() -> SqliteStore {
    let store = SqliteStore::new(db::open_in_memory().unwrap());
    for (amount, desc, cat, ty, at) in [
        ("10000", "pay", "Salary", "income", "2024-03-01T09:00:00.000000Z"),
        ("4000", "lunch", "Food", "expense", "2024-03-01T12:30:00.000000Z"),
        ("5000", "bus card", "Transport", "expense", "2024-02-15T08:00:00.000000Z"),
    ] {
        store
            .connection()
            .execute(
                "INSERT INTO transactions(amount, description, category, type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![amount, desc, cat, ty, at],
            )
            .unwrap();
    }
    store
}

fn app_with(store: Box<dyn RecordStore>, analysis: Box<dyn AnalysisClient>) -> App<Utc> {
    let collab = Collaborators {
        store,
        rate_source: Box::new(FixedRate(1300.0)),
        analysis,
        chart: Box::new(NoChart),
    };
    let prefs = PreferenceStore::load(db::open_in_memory().unwrap()).unwrap();
    let mut app = App::new(collab, prefs, LedgerService::new(Bucketer::new(Utc)));
    app.load().unwrap_or_default();
    app
}

fn setup() -> App<Utc> {
    app_with(Box::new(seeded_store()), Box::new(UnconfiguredAnalysis))
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn add_rounds_and_prepends_confirmed_row() {
    let mut app = setup();
    let mut input = AmountInput::new("123");
    input.blur();
    let tx = app
        .add_transaction(&input, "snack", None, TxType::Expense)
        .unwrap();
    assert_eq!(tx.amount, Decimal::from(120));
    assert_eq!(tx.category, "Food");
    assert_eq!(app.transactions().len(), 4);
    assert_eq!(app.transactions()[0].id, tx.id);
}

#[test]
fn add_rejects_before_calling_the_store() {
    let mut app = setup();
    let err = app
        .add_transaction(&AmountInput::new("1000"), "", Some("Pets"), TxType::Expense)
        .unwrap_err();
    assert!(matches!(
        err,
        EntryError::Validation(ValidationError::UnknownCategory(_))
    ));
    let err = app
        .add_transaction(&AmountInput::new("0"), "", None, TxType::Income)
        .unwrap_err();
    assert!(matches!(
        err,
        EntryError::Validation(ValidationError::NonPositiveAmount)
    ));
    assert_eq!(app.transactions().len(), 3);
}

#[test]
fn store_failures_leave_local_list_alone() {
    let mut app = setup();
    assert!(app.delete_transaction(999).is_err());
    assert_eq!(app.transactions().len(), 3);

    let mut down = app_with(Box::new(DownStore), Box::new(UnconfiguredAnalysis));
    assert!(down.load().is_err());
    assert!(down.transactions().is_empty());
    let err = down
        .add_transaction(&AmountInput::new("1000"), "", None, TxType::Income)
        .unwrap_err();
    assert!(matches!(err, EntryError::Store(_)));
    assert!(down.transactions().is_empty());
}

#[test]
fn delete_removes_after_confirmation() {
    let mut app = setup();
    let id = app.transactions()[0].id;
    app.delete_transaction(id).unwrap();
    assert!(app.transactions().iter().all(|t| t.id != id));
    assert_eq!(app.transactions().len(), 2);
}

#[test]
fn day_click_filters_visible_rows() {
    let mut app = setup();
    assert_eq!(app.visible_transactions().len(), 3);

    assert_eq!(app.click_date(d(2024, 3, 1)).unwrap(), Some(d(2024, 3, 1)));
    assert_eq!(app.visible_transactions().len(), 2);

    assert_eq!(app.click_date(d(2024, 2, 15)).unwrap(), Some(d(2024, 2, 15)));
    assert_eq!(app.visible_transactions().len(), 1);

    assert_eq!(app.click_date(d(2024, 2, 15)).unwrap(), None);
    assert_eq!(app.visible_transactions().len(), 3);
}

#[test]
fn amounts_render_in_display_currency() {
    let mut app = setup();
    assert_eq!(app.format_amount(Decimal::from(130_000)), "₩130,000");
    app.prefs_mut().set_currency(DisplayCurrency::Usd).unwrap();
    assert_eq!(app.format_amount(Decimal::from(130_000)), "$100.00");
    app.refresh_rate();
    assert_eq!(app.rates().cached(), Some(1300.0));
    assert_eq!(app.format_amount(Decimal::from(13_000)), "$10.00");
}

#[test]
fn analysis_unconfigured_is_an_error_value() {
    let app = setup();
    assert!(matches!(
        app.analyze_month(d(2024, 3, 1)),
        Err(AnalysisError::Unconfigured)
    ));
}

#[test]
fn analysis_receives_month_summary() {
    let seen = Rc::new(RefCell::new(None));
    let app = app_with(
        Box::new(seeded_store()),
        Box::new(RecordingAnalysis(seen.clone())),
    );
    let text = app.analyze_month(d(2024, 3, 20)).unwrap();
    assert_eq!(text, "You spent mostly on food.");

    let req = seen.borrow().clone().unwrap();
    assert_eq!(req.month_label, "March 2024");
    assert_eq!(req.income, Decimal::from(10_000));
    assert_eq!(req.expense, Decimal::from(4_000));
    assert_eq!(req.balance, Decimal::from(6_000));
    assert_eq!(req.top_categories.len(), 1);
    assert_eq!(req.top_categories[0].category, "Food");
    assert!(req.prompt().contains("Food 4000 KRW"));
}

#[test]
fn tx_list_limit_respected() {
    let app = setup();
    let matches = cli::build_cli().get_matches_from(["pocketledger", "tx", "list", "--limit", "2"]);
    if let Some(("tx", tx_m)) = matches.subcommand() {
        if let Some(("list", list_m)) = tx_m.subcommand() {
            let rows = transactions::query_rows(&app, list_m).unwrap();
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0].description, "lunch");
            assert_eq!(rows[0].created_at, "2024-03-01 12:30");
            assert_eq!(rows[0].amount, "₩4,000");
        } else {
            panic!("no list subcommand");
        }
    } else {
        panic!("no tx subcommand");
    }
}

#[test]
fn tx_list_month_and_selection() {
    let mut app = setup();
    app.click_date(d(2024, 2, 15)).unwrap();
    let cli = cli::build_cli();

    let m = cli.clone().get_matches_from(["pocketledger", "tx", "list"]);
    let list_m = m.subcommand_matches("tx").unwrap().subcommand_matches("list").unwrap();
    let rows = transactions::query_rows(&app, list_m).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].description, "bus card");

    let m = cli
        .clone()
        .get_matches_from(["pocketledger", "tx", "list", "--month", "2024-03"]);
    let list_m = m.subcommand_matches("tx").unwrap().subcommand_matches("list").unwrap();
    assert_eq!(transactions::query_rows(&app, list_m).unwrap().len(), 2);

    let m = cli.get_matches_from(["pocketledger", "tx", "list", "--all"]);
    let list_m = m.subcommand_matches("tx").unwrap().subcommand_matches("list").unwrap();
    assert_eq!(transactions::query_rows(&app, list_m).unwrap().len(), 3);
}

#[test]
fn export_writes_csv_oldest_first() {
    let app = setup();
    let dir = tempdir().unwrap();
    let out = dir.path().join("ledger.csv");
    let out_str = out.to_string_lossy().to_string();

    let n = exporter::export_transactions(app.transactions(), "csv", &out_str).unwrap();
    assert_eq!(n, 3);

    let mut rdr = csv::Reader::from_path(&out).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(&headers[5], "amount");
    let records: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(records.len(), 3);
    assert_eq!(&records[0][4], "bus card");
    assert_eq!(&records[2][2], "expense");

    assert!(exporter::export_transactions(app.transactions(), "xml", &out_str).is_err());
}

#[test]
fn text_chart_scales_to_largest_value() {
    let points = vec![
        ChartPoint {
            label: "01".into(),
            value: Decimal::from(6_000),
        },
        ChartPoint {
            label: "02".into(),
            value: Decimal::from(-3_000),
        },
    ];
    let text = TextBarChart { width: 10 }.render(&points).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "01 | ########## 6000");
    assert_eq!(lines[1], "02 | ----- -3000");
    assert!(NoChart.render(&points).is_none());
    assert!(TextBarChart::default().render(&[]).is_none());
}

#[test]
fn config_reads_environment_lookup() {
    let env: HashMap<&str, &str> = [
        ("POCKETLEDGER_STORE_URL", "https://x.supabase.co"),
        ("POCKETLEDGER_STORE_KEY", "anon"),
        ("OPENAI_API_KEY", "sk-test"),
        ("POCKETLEDGER_DB", "/tmp/ledger.sqlite"),
    ]
    .into_iter()
    .collect();
    let cfg = Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
    let remote = cfg.remote_store.unwrap();
    assert_eq!(remote.table, "transactions");
    assert_eq!(cfg.analysis.unwrap().api_key, "sk-test");
    assert_eq!(cfg.http_timeout.as_secs(), 15);
    assert_eq!(cfg.db_path.unwrap().to_string_lossy(), "/tmp/ledger.sqlite");

    let bare = Config::from_lookup(|k| (k == "POCKETLEDGER_STORE_URL").then(|| "u".to_string())).unwrap();
    assert!(bare.remote_store.is_none());
    assert!(bare.analysis.is_none());

    let bad = Config::from_lookup(|k| (k == "POCKETLEDGER_HTTP_TIMEOUT_SECS").then(|| "soon".to_string()));
    assert!(bad.is_err());
}

#[test]
fn chat_response_text_is_trimmed() {
    let body = r#"{"choices": [{"message": {"role": "assistant", "content": "  Spend less on food.\n"}}]}"#;
    assert_eq!(chat_text(200, body).unwrap(), "Spend less on food.");
}

#[test]
fn chat_response_failures_are_error_values() {
    match chat_text(429, "rate limited") {
        Err(AnalysisError::Status { status, body }) => {
            assert_eq!(status, 429);
            assert_eq!(body, "rate limited");
        }
        other => panic!("unexpected {:?}", other),
    }
    assert!(matches!(
        chat_text(200, r#"{"choices": []}"#),
        Err(AnalysisError::EmptyResponse)
    ));
    assert!(matches!(
        chat_text(200, r#"{"choices": [{"message": {"content": "   "}}, {"message": {"content": null}}]}"#),
        Err(AnalysisError::EmptyResponse)
    ));
    assert!(matches!(chat_text(200, "oops"), Err(AnalysisError::Decode(_))));
}

#[test]
fn rate_is_fetched_only_for_usd_display() {
    let calls = Rc::new(Cell::new(0));
    let collab = Collaborators {
        store: Box::new(seeded_store()),
        rate_source: Box::new(CountingRate(calls.clone())),
        analysis: Box::new(UnconfiguredAnalysis),
        chart: Box::new(NoChart),
    };
    let prefs = PreferenceStore::load(db::open_in_memory().unwrap()).unwrap();
    let mut app = App::new(collab, prefs, LedgerService::new(Bucketer::new(Utc)));

    app.prepare_display();
    assert_eq!(calls.get(), 0);

    app.prefs_mut().set_currency(DisplayCurrency::Usd).unwrap();
    app.prepare_display();
    app.prepare_display();
    assert_eq!(calls.get(), 1);
    assert_eq!(app.rates().cached(), Some(1300.0));
}

#[test]
fn cal_month_steps_between_months() {
    let cli = cli::build_cli();
    let reference = |args: &[&str]| {
        let m = cli.clone().get_matches_from(args.iter().copied());
        let month_m = m.subcommand_matches("cal").unwrap().subcommand_matches("month").unwrap();
        calendar::month_reference(month_m).unwrap()
    };
    assert_eq!(
        reference(&["pocketledger", "cal", "month", "--date", "2024-01-31"]),
        d(2024, 1, 31)
    );
    assert_eq!(
        reference(&["pocketledger", "cal", "month", "--date", "2024-01-31", "--next"]),
        d(2024, 2, 29)
    );
    assert_eq!(
        reference(&["pocketledger", "cal", "month", "--date", "2024-01-31", "--prev"]),
        d(2023, 12, 31)
    );
    assert!(
        cli.clone()
            .try_get_matches_from(["pocketledger", "cal", "month", "--prev", "--next"])
            .is_err()
    );
}
