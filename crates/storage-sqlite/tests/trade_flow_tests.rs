//! End-to-end trade flow over the SQLite ledger store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::tempdir;

use papertrade_core::accounts::{AccountService, AccountServiceTrait, NewAccount};
use papertrade_core::errors::{Error, Result};
use papertrade_core::ledger::{LedgerError, LedgerRepositoryTrait};
use papertrade_core::portfolio::{
    PerformanceService, PerformanceServiceTrait, TimeWindow, ValuationService,
    ValuationServiceTrait,
};
use papertrade_core::quotes::{Quote, QuoteSourceTrait};
use papertrade_core::trading::{TradeService, TradeServiceTrait};
use papertrade_storage_sqlite::{
    create_pool, run_migrations, spawn_writer, AccountRepository, LedgerRepository,
};

struct FixedQuotes {
    prices: Mutex<HashMap<String, Decimal>>,
}

impl FixedQuotes {
    fn new() -> Self {
        Self {
            prices: Mutex::new(HashMap::new()),
        }
    }

    fn set(&self, symbol: &str, price: Decimal) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }
}

#[async_trait]
impl QuoteSourceTrait for FixedQuotes {
    async fn lookup(&self, symbol: &str) -> Result<Quote> {
        let price = self.prices.lock().unwrap().get(symbol).copied();
        price
            .map(|price| Quote {
                symbol: symbol.to_string(),
                price,
                timestamp: Utc::now(),
            })
            .ok_or_else(|| Error::Ledger(LedgerError::QuoteUnavailable(symbol.to_string())))
    }
}

struct App {
    accounts: AccountService,
    ledger: Arc<LedgerRepository>,
    trades: TradeService,
    valuation: Arc<ValuationService>,
    performance: PerformanceService,
    quotes: Arc<FixedQuotes>,
    _dir: tempfile::TempDir,
}

fn setup() -> App {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let db_path = temp_dir.path().join("papertrade.db");
    let pool = create_pool(&db_path.to_string_lossy()).expect("Failed to create pool");
    run_migrations(&pool).expect("Failed to run migrations");
    let writer = spawn_writer((*pool).clone());

    let ledger = Arc::new(LedgerRepository::new(Arc::clone(&pool), writer.clone()));
    let quotes = Arc::new(FixedQuotes::new());
    let valuation = Arc::new(ValuationService::new(ledger.clone(), quotes.clone()));

    App {
        accounts: AccountService::new(Arc::new(AccountRepository::new(pool, writer))),
        trades: TradeService::new(ledger.clone(), quotes.clone()),
        performance: PerformanceService::new(valuation.clone()),
        ledger,
        valuation,
        quotes,
        _dir: temp_dir,
    }
}

#[tokio::test]
async fn test_register_trade_and_value() {
    let app = setup();
    let account = app
        .accounts
        .register(NewAccount::new("alice", "hash"))
        .await
        .unwrap();
    assert_eq!(app.ledger.get_cash(&account.id).unwrap(), dec!(10000));

    app.quotes.set("SYM", dec!(50));
    let bought = app.trades.buy(&account.id, "sym", 10).await.unwrap();
    assert_eq!(bought.total, dec!(10000));

    app.quotes.set("SYM", dec!(60));
    let sold = app.trades.sell(&account.id, "SYM", 4).await.unwrap();
    assert_eq!(sold.total, dec!(10100));
    assert_eq!(app.ledger.get_cash(&account.id).unwrap(), dec!(9740));
    assert_eq!(app.ledger.get_position(&account.id, "SYM").unwrap(), 6);

    app.quotes.set("SYM", dec!(70));
    let valuation = app.valuation.current_valuation(&account.id).await.unwrap();
    assert_eq!(valuation.total, dec!(10160));
    assert_eq!(valuation.holdings[0].market_value, dec!(420));

    let summary = app
        .performance
        .analyze(&account.id, TimeWindow::OneMonth)
        .await
        .unwrap();
    // Both trades land on today's date, so the window holds a single point.
    assert_eq!(summary.series.len(), 1);
    assert_eq!(summary.series[0].total, dec!(10100));
    assert_eq!(summary.gain_loss, dec!(0));
}

#[tokio::test]
async fn test_rejections_surface_typed_errors() {
    let app = setup();
    let account = app
        .accounts
        .register(NewAccount::new("bob", "hash"))
        .await
        .unwrap();

    let err = app.trades.buy(&account.id, "NOPE", 1).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(LedgerError::QuoteUnavailable(_))
    ));

    app.quotes.set("BIG", dec!(20000));
    let err = app.trades.buy(&account.id, "BIG", 1).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(LedgerError::InsufficientFunds { .. })
    ));

    let err = app.trades.sell(&account.id, "BIG", 1).await.unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(LedgerError::InsufficientShares { .. })
    ));

    assert_eq!(app.ledger.get_cash(&account.id).unwrap(), dec!(10000));
    assert!(app.ledger.get_transactions(&account.id).unwrap().is_empty());
    let err = app
        .performance
        .analyze("missing", TimeWindow::OneMonth)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Ledger(LedgerError::AccountNotFound(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_distinct_accounts_trade_independently() {
    let app = Arc::new(setup());
    app.quotes.set("SYM", dec!(100));

    let mut ids = Vec::new();
    for name in ["a", "b", "c"] {
        let account = app
            .accounts
            .register(NewAccount::new(name, "hash"))
            .await
            .unwrap();
        ids.push(account.id);
    }

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let app = Arc::clone(&app);
            tokio::spawn(async move {
                for _ in 0..5 {
                    app.trades.buy(&id, "SYM", 2).await?;
                }
                Ok::<_, Error>(())
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for id in &ids {
        assert_eq!(app.ledger.get_cash(id).unwrap(), dec!(9000));
        assert_eq!(app.ledger.get_position(id, "SYM").unwrap(), 10);
    }
}
