use log::{debug, info};
use std::sync::Arc;

use super::accounts_model::{Account, NewAccount};
use super::accounts_traits::{AccountRepositoryTrait, AccountServiceTrait};
use crate::errors::{Error, Result, ValidationError};

/// Service for managing accounts
pub struct AccountService {
    repository: Arc<dyn AccountRepositoryTrait>,
}

impl AccountService {
    /// Creates a new AccountService instance
    pub fn new(repository: Arc<dyn AccountRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl AccountServiceTrait for AccountService {
    async fn register(&self, mut new_account: NewAccount) -> Result<Account> {
        new_account.username = new_account.username.trim().to_string();
        new_account.validate()?;

        debug!(
            "Registering account {} with opening cash {}",
            new_account.username,
            new_account.opening_cash()
        );

        if self
            .repository
            .get_by_username(&new_account.username)?
            .is_some()
        {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Username '{}' is already taken",
                new_account.username
            ))));
        }

        let account = self.repository.create(new_account).await?;
        info!("Registered account {} ({})", account.id, account.username);
        Ok(account)
    }

    async fn change_credential(&self, account_id: &str, credential_hash: &str) -> Result<Account> {
        if credential_hash.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "credentialHash".to_string(),
            )));
        }
        self.repository
            .update_credential_hash(account_id, credential_hash)
            .await
    }

    async fn delete_account(&self, account_id: &str) -> Result<()> {
        self.repository.delete(account_id).await?;
        Ok(())
    }

    fn get_account(&self, account_id: &str) -> Result<Account> {
        self.repository.get_by_id(account_id)
    }

    fn get_account_by_username(&self, username: &str) -> Result<Option<Account>> {
        self.repository.get_by_username(username.trim())
    }
}
