use async_trait::async_trait;
use chrono::NaiveDateTime;
use diesel::dsl::max;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use log::debug;
use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;

use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{accounts, positions, transactions};

use super::model::{NewTransactionDB, PositionDB, TransactionDB};
use papertrade_core::errors::{Error, Result};
use papertrade_core::ledger::{
    compute_trade_effect, next_timestamp, stamp_total, LedgerError, LedgerRepositoryTrait,
    LedgerSnapshot, Position, TradeRequest, Transaction,
};

/// Ledger store backed by SQLite.
///
/// Reads go through the pool; every trade goes through the writer actor,
/// whose immediate transaction makes the balance re-check, the cash update,
/// the position change and the transaction insert one atomic unit.
pub struct LedgerRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl LedgerRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        Self { pool, writer }
    }
}

fn read_cash(conn: &mut SqliteConnection, account_id: &str) -> Result<Decimal> {
    let stored = accounts::table
        .find(account_id)
        .select(accounts::cash)
        .first::<String>(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::Ledger(LedgerError::AccountNotFound(account_id.to_string())))?;
    Ok(Decimal::from_str(&stored)?)
}

fn read_positions(conn: &mut SqliteConnection, account_id: &str) -> Result<Vec<Position>> {
    let rows = positions::table
        .filter(positions::account_id.eq(account_id))
        .order(positions::symbol.asc())
        .select(PositionDB::as_select())
        .load::<PositionDB>(conn)
        .into_core()?;
    Ok(rows.into_iter().map(Position::from).collect())
}

fn last_transacted_at(
    conn: &mut SqliteConnection,
    account_id: &str,
) -> Result<Option<NaiveDateTime>> {
    transactions::table
        .filter(transactions::account_id.eq(account_id))
        .select(max(transactions::transacted_at))
        .first::<Option<NaiveDateTime>>(conn)
        .into_core()
}

fn to_transactions(rows: Vec<TransactionDB>) -> Result<Vec<Transaction>> {
    rows.into_iter().map(Transaction::try_from).collect()
}

#[async_trait]
impl LedgerRepositoryTrait for LedgerRepository {
    fn get_cash(&self, account_id: &str) -> Result<Decimal> {
        let mut conn = get_connection(&self.pool)?;
        read_cash(&mut conn, account_id)
    }

    fn get_position(&self, account_id: &str, symbol: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|c| {
            read_cash(c, account_id)?;
            let quantity = positions::table
                .filter(positions::account_id.eq(account_id))
                .filter(positions::symbol.eq(symbol))
                .select(positions::quantity)
                .first::<i64>(c)
                .optional()?;
            Ok(quantity.unwrap_or(0))
        })
        .map_err(Error::from)
    }

    fn get_positions(&self, account_id: &str) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|c| {
            read_cash(c, account_id)?;
            Ok(read_positions(c, account_id)?)
        })
        .map_err(Error::from)
    }

    fn get_snapshot(&self, account_id: &str) -> Result<LedgerSnapshot> {
        let mut conn = get_connection(&self.pool)?;
        conn.transaction::<_, StorageError, _>(|c| {
            let cash = read_cash(c, account_id)?;
            let positions = read_positions(c, account_id)?;
            Ok(LedgerSnapshot {
                account_id: account_id.to_string(),
                cash,
                positions,
            })
        })
        .map_err(Error::from)
    }

    async fn apply_trade(&self, request: TradeRequest) -> Result<Transaction> {
        request.validate()?;

        self.writer
            .exec(move |conn| {
                let cash = read_cash(conn, &request.account_id)?;
                let mut positions_after = read_positions(conn, &request.account_id)?;
                let held = positions_after
                    .iter()
                    .find(|p| p.symbol == request.symbol)
                    .map(|p| p.quantity)
                    .unwrap_or(0);

                let effect = compute_trade_effect(cash, held, &request)?;

                positions_after.retain(|p| p.symbol != request.symbol);
                if effect.quantity_after > 0 {
                    positions_after.push(Position {
                        account_id: request.account_id.clone(),
                        symbol: request.symbol.clone(),
                        quantity: effect.quantity_after,
                    });
                }
                let total = stamp_total(effect.cash_after, &positions_after, &request)?;

                let last = last_transacted_at(conn, &request.account_id)?;
                let transacted_at = next_timestamp(request.transacted_at, last);

                diesel::update(accounts::table.find(&request.account_id))
                    .set((
                        accounts::cash.eq(effect.cash_after.to_string()),
                        accounts::updated_at.eq(transacted_at),
                    ))
                    .execute(conn)
                    .into_core()?;

                let position_row = positions::table
                    .filter(positions::account_id.eq(&request.account_id))
                    .filter(positions::symbol.eq(&request.symbol));
                if effect.quantity_after == 0 {
                    diesel::delete(position_row).execute(conn).into_core()?;
                } else if held == 0 {
                    diesel::insert_into(positions::table)
                        .values(&PositionDB {
                            account_id: request.account_id.clone(),
                            symbol: request.symbol.clone(),
                            quantity: effect.quantity_after,
                        })
                        .execute(conn)
                        .into_core()?;
                } else {
                    diesel::update(position_row)
                        .set(positions::quantity.eq(effect.quantity_after))
                        .execute(conn)
                        .into_core()?;
                }

                let row = diesel::insert_into(transactions::table)
                    .values(&NewTransactionDB {
                        account_id: request.account_id.clone(),
                        symbol: request.symbol.clone(),
                        shares: request.shares,
                        price: request.price.to_string(),
                        total: total.to_string(),
                        transacted_at,
                    })
                    .returning(TransactionDB::as_returning())
                    .get_result::<TransactionDB>(conn)
                    .into_core()?;

                debug!(
                    "Recorded transaction {} for {}: {} {} @ {}",
                    row.id, row.account_id, row.shares, row.symbol, row.price
                );
                Transaction::try_from(row)
            })
            .await
    }

    fn get_transactions(&self, account_id: &str) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = conn
            .transaction::<_, StorageError, _>(|c| {
                read_cash(c, account_id)?;
                Ok(transactions::table
                    .filter(transactions::account_id.eq(account_id))
                    .order((transactions::transacted_at.desc(), transactions::id.desc()))
                    .select(TransactionDB::as_select())
                    .load::<TransactionDB>(c)?)
            })
            .map_err(Error::from)?;
        to_transactions(rows)
    }

    fn get_transactions_since(
        &self,
        account_id: &str,
        since: NaiveDateTime,
    ) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = conn
            .transaction::<_, StorageError, _>(|c| {
                read_cash(c, account_id)?;
                Ok(transactions::table
                    .filter(transactions::account_id.eq(account_id))
                    .filter(transactions::transacted_at.ge(since))
                    .order((transactions::transacted_at.asc(), transactions::id.asc()))
                    .select(TransactionDB::as_select())
                    .load::<TransactionDB>(c)?)
            })
            .map_err(Error::from)?;
        to_transactions(rows)
    }
}
