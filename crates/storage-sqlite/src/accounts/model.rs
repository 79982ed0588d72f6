//! Database model for accounts.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use papertrade_core::accounts::{Account, NewAccount};
use papertrade_core::errors::Error;

/// Database model for accounts
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::accounts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct AccountDB {
    pub id: String,
    pub username: String,
    pub credential_hash: String,
    /// Decimal stored as text
    pub cash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TryFrom<AccountDB> for Account {
    type Error = Error;

    fn try_from(db: AccountDB) -> Result<Self, Self::Error> {
        Ok(Self {
            cash: Decimal::from_str(&db.cash)?,
            id: db.id,
            username: db.username,
            credential_hash: db.credential_hash,
            created_at: db.created_at,
            updated_at: db.updated_at,
        })
    }
}

impl From<NewAccount> for AccountDB {
    fn from(domain: NewAccount) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            cash: domain.opening_cash().to_string(),
            id: domain
                .id
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            username: domain.username,
            credential_hash: domain.credential_hash,
            created_at: now,
            updated_at: now,
        }
    }
}
