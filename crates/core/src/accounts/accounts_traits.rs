//! Account repository and service traits.
//!
//! These traits define the contract for account operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::accounts_model::{Account, NewAccount};
use crate::errors::Result;

/// Trait defining the contract for Account repository operations.
///
/// Cash is deliberately absent from this contract: only the ledger store
/// mutates it, inside a trade.
#[async_trait]
pub trait AccountRepositoryTrait: Send + Sync {
    /// Creates a new account with its opening cash balance.
    async fn create(&self, new_account: NewAccount) -> Result<Account>;

    /// Replaces the stored credential hash.
    async fn update_credential_hash(&self, account_id: &str, credential_hash: &str)
        -> Result<Account>;

    /// Deletes an account with its positions and transactions.
    ///
    /// Returns the number of deleted records.
    async fn delete(&self, account_id: &str) -> Result<usize>;

    /// Retrieves an account by its ID.
    fn get_by_id(&self, account_id: &str) -> Result<Account>;

    /// Retrieves an account by its username, if registered.
    fn get_by_username(&self, username: &str) -> Result<Option<Account>>;
}

/// Trait defining the contract for Account service operations.
#[async_trait]
pub trait AccountServiceTrait: Send + Sync {
    /// Registers a new account after validating it.
    async fn register(&self, new_account: NewAccount) -> Result<Account>;

    /// Replaces the credential hash of an account.
    async fn change_credential(&self, account_id: &str, credential_hash: &str) -> Result<Account>;

    /// Deletes an account and everything it owns.
    async fn delete_account(&self, account_id: &str) -> Result<()>;

    /// Retrieves an account by ID.
    fn get_account(&self, account_id: &str) -> Result<Account>;

    /// Retrieves an account by username.
    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>>;
}
