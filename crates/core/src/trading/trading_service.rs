use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use tokio::sync::Mutex;

use super::trading_traits::TradeServiceTrait;
use crate::errors::{Error, Result};
use crate::ledger::{
    compute_trade_effect, normalize_symbol, LedgerError, LedgerRepositoryTrait, TradeRequest,
    TradeSide, Transaction,
};
use crate::quotes::{QuoteCache, QuoteSourceTrait};
use crate::utils::time_utils;

/// A missing mark found at commit time is fetched once, outside the lock,
/// before the trade is given up.
const COMMIT_ATTEMPTS: usize = 2;

/// Service executing buys and sells against the ledger store.
pub struct TradeService {
    ledger: Arc<dyn LedgerRepositoryTrait>,
    quote_source: Arc<dyn QuoteSourceTrait>,
    account_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TradeService {
    pub fn new(
        ledger: Arc<dyn LedgerRepositoryTrait>,
        quote_source: Arc<dyn QuoteSourceTrait>,
    ) -> Self {
        Self {
            ledger,
            quote_source,
            account_locks: DashMap::new(),
        }
    }

    fn account_lock(&self, account_id: &str) -> Arc<Mutex<()>> {
        self.account_locks
            .entry(account_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn execute(
        &self,
        account_id: &str,
        symbol: &str,
        shares: i64,
        side: TradeSide,
    ) -> Result<Transaction> {
        let symbol = normalize_symbol(symbol)?;

        let quote = self.quote_source.lookup(&symbol).await.map_err(|e| {
            warn!("Rejected {:?} of {}: quote lookup failed: {}", side, symbol, e);
            LedgerError::QuoteUnavailable(symbol.clone())
        })?;

        if shares <= 0 {
            warn!("Rejected {:?} of {}: invalid quantity {}", side, symbol, shares);
            return Err(LedgerError::InvalidQuantity(shares).into());
        }
        let delta = match side {
            TradeSide::Buy => shares,
            TradeSide::Sell => -shares,
        };

        // Marks for everything else held, fetched before taking the lock.
        let mut cache = QuoteCache::new(Arc::clone(&self.quote_source));
        cache.seed(&symbol, quote.price);
        let held = self
            .ledger
            .get_positions(account_id)
            .map_err(|e| store_failure(e, account_id))?;
        if let Err(e) = cache
            .fetch_all(held.iter().map(|p| p.symbol.as_str()))
            .await
        {
            warn!("Rejected {:?} of {} for {}: {}", side, symbol, account_id, e);
            return Err(e.into());
        }

        let lock = self.account_lock(account_id);
        let mut attempt = 0;
        loop {
            attempt += 1;
            let outcome = {
                let _guard = lock.lock().await;
                self.commit_locked(account_id, &symbol, delta, quote.price, &cache)
                    .await
            };

            let err = match outcome {
                Ok(transaction) => {
                    info!(
                        "{:?} {} {} @ {} ({}) for account {} (total {})",
                        side,
                        shares,
                        symbol,
                        transaction.price,
                        transaction.gross_amount(),
                        account_id,
                        transaction.total
                    );
                    return Ok(transaction);
                }
                Err(e) => e,
            };

            match err.as_ledger_error() {
                Some(LedgerError::UnpricedPositions { symbols }) if attempt < COMMIT_ATTEMPTS => {
                    debug!(
                        "Positions of {} changed during {:?} of {}; fetching marks for {:?}",
                        account_id, side, symbol, symbols
                    );
                    let symbols = symbols.clone();
                    cache
                        .fetch_all(symbols.iter().map(String::as_str))
                        .await
                        .map_err(|e| {
                            warn!("Rejected {:?} of {} for {}: {}", side, symbol, account_id, e);
                            e
                        })?;
                }
                Some(LedgerError::UnpricedPositions { symbols }) => {
                    warn!(
                        "Rejected {:?} of {} for {}: no marks for {:?}",
                        side, symbol, account_id, symbols
                    );
                    return Err(LedgerError::PartialQuoteFailure {
                        symbols: symbols.clone(),
                    }
                    .into());
                }
                Some(rejection) => {
                    warn!(
                        "Rejected {:?} of {} for {}: {}",
                        side, symbol, account_id, rejection
                    );
                    return Err(err);
                }
                None => return Err(store_failure(err, account_id)),
            }
        }
    }

    /// Pre-validates against a fresh snapshot and applies the trade. Must be
    /// called with the account lock held.
    async fn commit_locked(
        &self,
        account_id: &str,
        symbol: &str,
        delta: i64,
        price: Decimal,
        cache: &QuoteCache,
    ) -> Result<Transaction> {
        let snapshot = self.ledger.get_snapshot(account_id)?;

        let marks: HashMap<String, Decimal> = snapshot
            .positions
            .iter()
            .filter(|p| p.symbol != symbol)
            .filter_map(|p| cache.get(&p.symbol).map(|price| (p.symbol.clone(), price)))
            .collect();

        let request = TradeRequest {
            account_id: account_id.to_string(),
            symbol: symbol.to_string(),
            shares: delta,
            price,
            marks,
            transacted_at: time_utils::utc_now(),
        };

        compute_trade_effect(snapshot.cash, snapshot.quantity_of(symbol), &request)
            .map_err(Error::from)?;

        self.ledger.apply_trade(request).await
    }
}

/// Infrastructure failures surface as `LedgerUnavailable`; anything else is
/// returned unchanged.
fn store_failure(err: Error, account_id: &str) -> Error {
    if err.is_infrastructure() {
        error!("Ledger store failed for account {}: {}", account_id, err);
        LedgerError::LedgerUnavailable(err.to_string()).into()
    } else {
        err
    }
}

#[async_trait]
impl TradeServiceTrait for TradeService {
    async fn buy(&self, account_id: &str, symbol: &str, shares: i64) -> Result<Transaction> {
        self.execute(account_id, symbol, shares, TradeSide::Buy)
            .await
    }

    async fn sell(&self, account_id: &str, symbol: &str, shares: i64) -> Result<Transaction> {
        self.execute(account_id, symbol, shares, TradeSide::Sell)
            .await
    }
}
