//! Database models for positions and transactions.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use papertrade_core::errors::Error;
use papertrade_core::ledger::{Position, Transaction};

#[derive(Queryable, Selectable, Insertable, Debug, Clone, PartialEq)]
#[diesel(table_name = crate::schema::positions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PositionDB {
    pub account_id: String,
    pub symbol: String,
    pub quantity: i64,
}

impl From<PositionDB> for Position {
    fn from(db: PositionDB) -> Self {
        Self {
            account_id: db.account_id,
            symbol: db.symbol,
            quantity: db.quantity,
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionDB {
    pub id: i64,
    pub account_id: String,
    pub symbol: String,
    pub shares: i64,
    pub price: String,
    pub total: String,
    pub transacted_at: NaiveDateTime,
}

impl TryFrom<TransactionDB> for Transaction {
    type Error = Error;

    fn try_from(db: TransactionDB) -> Result<Self, Self::Error> {
        Ok(Self {
            price: Decimal::from_str(&db.price)?,
            total: Decimal::from_str(&db.total)?,
            id: db.id,
            account_id: db.account_id,
            symbol: db.symbol,
            shares: db.shares,
            transacted_at: db.transacted_at,
        })
    }
}

/// Insert model; the id is assigned by SQLite.
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::transactions)]
pub struct NewTransactionDB {
    pub account_id: String,
    pub symbol: String,
    pub shares: i64,
    pub price: String,
    pub total: String,
    pub transacted_at: NaiveDateTime,
}
