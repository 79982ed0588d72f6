//! Account domain models.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::accounts_constants::{DEFAULT_STARTING_CASH, MAX_USERNAME_LEN};
use crate::{errors::ValidationError, Error, Result};

/// Domain model representing a trading account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub username: String,
    /// Cash balance; never negative
    pub cash: Decimal,
    /// Opaque credential hash produced by the authentication layer
    #[serde(skip_serializing, default)]
    pub credential_hash: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for registering a new account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub username: String,
    pub credential_hash: String,
    /// Overrides `DEFAULT_STARTING_CASH` when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_cash: Option<Decimal>,
}

impl NewAccount {
    pub fn new(username: impl Into<String>, credential_hash: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            credential_hash: credential_hash.into(),
            starting_cash: None,
        }
    }

    /// Cash the account opens with.
    pub fn opening_cash(&self) -> Decimal {
        self.starting_cash.unwrap_or(DEFAULT_STARTING_CASH)
    }

    /// Validates the new account data.
    pub fn validate(&self) -> Result<()> {
        let username = self.username.trim();
        if username.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Username cannot be empty".to_string(),
            )));
        }
        if username.len() > MAX_USERNAME_LEN {
            return Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Username cannot exceed {} characters",
                MAX_USERNAME_LEN
            ))));
        }
        if self.credential_hash.is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "credentialHash".to_string(),
            )));
        }
        if self.opening_cash() < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Starting cash cannot be negative".to_string(),
            )));
        }
        Ok(())
    }
}
