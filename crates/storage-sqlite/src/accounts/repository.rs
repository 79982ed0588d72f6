use async_trait::async_trait;
use diesel::prelude::*;
use diesel::r2d2::{self, Pool};
use diesel::sqlite::SqliteConnection;
use log::debug;
use std::sync::Arc;

use crate::db::{get_connection, WriteHandle};
use crate::errors::IntoCore;
use crate::schema::accounts;
use crate::schema::accounts::dsl::*;

use super::model::AccountDB;
use papertrade_core::accounts::{Account, AccountRepositoryTrait, NewAccount};
use papertrade_core::errors::{DatabaseError, Error, Result};

/// Repository for managing account data in the database
pub struct AccountRepository {
    pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
    writer: WriteHandle,
}

impl AccountRepository {
    /// Creates a new AccountRepository instance
    pub fn new(
        pool: Arc<Pool<r2d2::ConnectionManager<SqliteConnection>>>,
        writer: WriteHandle,
    ) -> Self {
        Self { pool, writer }
    }
}

#[async_trait]
impl AccountRepositoryTrait for AccountRepository {
    async fn create(&self, new_account: NewAccount) -> Result<Account> {
        new_account.validate()?;

        self.writer
            .exec(move |conn| {
                let account_db: AccountDB = new_account.into();

                diesel::insert_into(accounts::table)
                    .values(&account_db)
                    .execute(conn)
                    .into_core()?;

                debug!("Inserted account {}", account_db.id);
                Account::try_from(account_db)
            })
            .await
    }

    async fn update_credential_hash(
        &self,
        account_id: &str,
        new_hash: &str,
    ) -> Result<Account> {
        let account_id = account_id.to_string();
        let new_hash = new_hash.to_string();

        self.writer
            .exec(move |conn| {
                let affected = diesel::update(accounts.find(&account_id))
                    .set((
                        credential_hash.eq(&new_hash),
                        updated_at.eq(chrono::Utc::now().naive_utc()),
                    ))
                    .execute(conn)
                    .into_core()?;

                if affected == 0 {
                    return Err(Error::Database(DatabaseError::NotFound(format!(
                        "Account {} not found",
                        account_id
                    ))));
                }

                let account_db = accounts
                    .select(AccountDB::as_select())
                    .find(&account_id)
                    .first::<AccountDB>(conn)
                    .into_core()?;
                Account::try_from(account_db)
            })
            .await
    }

    /// Deletes an account by its ID and returns the number of deleted records.
    /// Positions and transactions go with it.
    async fn delete(&self, account_id_param: &str) -> Result<usize> {
        let id_to_delete_owned = account_id_param.to_string();
        self.writer
            .exec(move |conn| {
                diesel::delete(accounts.find(id_to_delete_owned))
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    /// Retrieves an account by its ID
    fn get_by_id(&self, account_id: &str) -> Result<Account> {
        let mut conn = get_connection(&self.pool)?;

        let account = accounts
            .select(AccountDB::as_select())
            .find(account_id)
            .first::<AccountDB>(&mut conn)
            .into_core()?;

        Account::try_from(account)
    }

    fn get_by_username(&self, name: &str) -> Result<Option<Account>> {
        let mut conn = get_connection(&self.pool)?;

        accounts
            .select(AccountDB::as_select())
            .filter(username.eq(name))
            .first::<AccountDB>(&mut conn)
            .optional()
            .into_core()?
            .map(Account::try_from)
            .transpose()
    }
}
