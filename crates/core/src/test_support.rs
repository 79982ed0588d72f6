//! In-memory fakes shared by the service tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use rust_decimal::Decimal;

use crate::errors::{DatabaseError, Error, Result};
use crate::ledger::{
    compute_trade_effect, next_timestamp, stamp_total, LedgerError, LedgerRepositoryTrait,
    LedgerSnapshot, Position, TradeRequest, Transaction,
};
use crate::quotes::{Quote, QuoteSourceTrait};

// ============================================================================
// Quote source
// ============================================================================

pub struct StaticQuoteSource {
    prices: Mutex<HashMap<String, Decimal>>,
    lookups: Mutex<HashMap<String, usize>>,
    delay: Option<Duration>,
}

impl StaticQuoteSource {
    pub fn new(prices: &[(&str, Decimal)]) -> Self {
        Self {
            prices: Mutex::new(
                prices
                    .iter()
                    .map(|(s, p)| (s.to_string(), *p))
                    .collect(),
            ),
            lookups: Mutex::new(HashMap::new()),
            delay: None,
        }
    }

    /// Every lookup sleeps for `delay` first, to widen race windows.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn set_price(&self, symbol: &str, price: Decimal) {
        self.prices.lock().unwrap().insert(symbol.to_string(), price);
    }

    /// Makes subsequent lookups of `symbol` fail.
    pub fn remove(&self, symbol: &str) {
        self.prices.lock().unwrap().remove(symbol);
    }

    pub fn lookup_count(&self, symbol: &str) -> usize {
        self.lookups
            .lock()
            .unwrap()
            .get(symbol)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl QuoteSourceTrait for StaticQuoteSource {
    async fn lookup(&self, symbol: &str) -> Result<Quote> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        *self
            .lookups
            .lock()
            .unwrap()
            .entry(symbol.to_string())
            .or_insert(0) += 1;

        let price = self.prices.lock().unwrap().get(symbol).copied();
        match price {
            Some(price) => Ok(Quote {
                symbol: symbol.to_string(),
                price,
                timestamp: Utc::now(),
            }),
            None => Err(Error::MarketData(
                papertrade_market_data::MarketDataError::SymbolNotFound(symbol.to_string()),
            )),
        }
    }
}

// ============================================================================
// Ledger store
// ============================================================================

#[derive(Default)]
struct AccountBook {
    cash: Decimal,
    positions: BTreeMap<String, i64>,
    transactions: Vec<Transaction>,
}

impl AccountBook {
    fn positions(&self, account_id: &str) -> Vec<Position> {
        self.positions
            .iter()
            .map(|(symbol, quantity)| Position {
                account_id: account_id.to_string(),
                symbol: symbol.clone(),
                quantity: *quantity,
            })
            .collect()
    }
}

/// Ledger store holding every account behind one mutex, so each
/// `apply_trade` is trivially atomic.
#[derive(Default)]
pub struct InMemoryLedger {
    books: Mutex<HashMap<String, AccountBook>>,
    next_id: AtomicI64,
    fail_writes: AtomicBool,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open_account(&self, account_id: &str, cash: Decimal) {
        self.books.lock().unwrap().insert(
            account_id.to_string(),
            AccountBook {
                cash,
                ..Default::default()
            },
        );
    }

    /// Appends a transaction with a chosen total and timestamp, bypassing
    /// trade arithmetic. Used to build history fixtures.
    pub fn record(&self, account_id: &str, total: Decimal, at: NaiveDateTime) {
        let mut books = self.books.lock().unwrap();
        let book = books.entry(account_id.to_string()).or_default();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        book.transactions.push(Transaction {
            id,
            account_id: account_id.to_string(),
            symbol: "FIXTURE".to_string(),
            shares: 1,
            price: Decimal::ONE,
            total,
            transacted_at: at,
        });
    }

    /// Places a position directly, bypassing trade arithmetic.
    pub fn hold(&self, account_id: &str, symbol: &str, quantity: i64) {
        let mut books = self.books.lock().unwrap();
        let book = books.entry(account_id.to_string()).or_default();
        book.positions.insert(symbol.to_string(), quantity);
    }

    /// Makes every subsequent `apply_trade` fail as an infrastructure error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn not_found(account_id: &str) -> Error {
        Error::Ledger(LedgerError::AccountNotFound(account_id.to_string()))
    }
}

#[async_trait]
impl LedgerRepositoryTrait for InMemoryLedger {
    fn get_cash(&self, account_id: &str) -> Result<Decimal> {
        let books = self.books.lock().unwrap();
        books
            .get(account_id)
            .map(|b| b.cash)
            .ok_or_else(|| Self::not_found(account_id))
    }

    fn get_position(&self, account_id: &str, symbol: &str) -> Result<i64> {
        let books = self.books.lock().unwrap();
        let book = books
            .get(account_id)
            .ok_or_else(|| Self::not_found(account_id))?;
        Ok(book.positions.get(symbol).copied().unwrap_or(0))
    }

    fn get_positions(&self, account_id: &str) -> Result<Vec<Position>> {
        let books = self.books.lock().unwrap();
        let book = books
            .get(account_id)
            .ok_or_else(|| Self::not_found(account_id))?;
        Ok(book.positions(account_id))
    }

    fn get_snapshot(&self, account_id: &str) -> Result<LedgerSnapshot> {
        let books = self.books.lock().unwrap();
        let book = books
            .get(account_id)
            .ok_or_else(|| Self::not_found(account_id))?;
        Ok(LedgerSnapshot {
            account_id: account_id.to_string(),
            cash: book.cash,
            positions: book.positions(account_id),
        })
    }

    async fn apply_trade(&self, request: TradeRequest) -> Result<Transaction> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Database(DatabaseError::TransactionFailed(
                "simulated write failure".to_string(),
            )));
        }

        let mut books = self.books.lock().unwrap();
        let book = books
            .get_mut(&request.account_id)
            .ok_or_else(|| Self::not_found(&request.account_id))?;

        let held = book.positions.get(&request.symbol).copied().unwrap_or(0);
        let effect = compute_trade_effect(book.cash, held, &request)?;

        let mut positions_after = book.positions.clone();
        if effect.quantity_after > 0 {
            positions_after.insert(request.symbol.clone(), effect.quantity_after);
        } else {
            positions_after.remove(&request.symbol);
        }
        let total = stamp_total(
            effect.cash_after,
            &positions_after
                .iter()
                .map(|(symbol, quantity)| Position {
                    account_id: request.account_id.clone(),
                    symbol: symbol.clone(),
                    quantity: *quantity,
                })
                .collect::<Vec<_>>(),
            &request,
        )?;

        let last = book.transactions.iter().map(|t| t.transacted_at).max();
        let transaction = Transaction {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            account_id: request.account_id.clone(),
            symbol: request.symbol.clone(),
            shares: request.shares,
            price: request.price,
            total,
            transacted_at: next_timestamp(request.transacted_at, last),
        };

        book.cash = effect.cash_after;
        book.positions = positions_after;
        book.transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn get_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let books = self.books.lock().unwrap();
        let book = books
            .get(account_id)
            .ok_or_else(|| Self::not_found(account_id))?;
        let mut transactions = book.transactions.clone();
        transactions.sort_by(|a, b| (b.transacted_at, b.id).cmp(&(a.transacted_at, a.id)));
        Ok(transactions)
    }

    fn get_transactions_since(
        &self,
        account_id: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<Transaction>> {
        let books = self.books.lock().unwrap();
        let book = books
            .get(account_id)
            .ok_or_else(|| Self::not_found(account_id))?;
        let mut transactions: Vec<_> = book
            .transactions
            .iter()
            .filter(|t| t.transacted_at >= since)
            .cloned()
            .collect();
        transactions.sort_by(|a, b| (a.transacted_at, a.id).cmp(&(b.transacted_at, b.id)));
        Ok(transactions)
    }
}
