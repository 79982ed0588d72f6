//! Quote source trait.

use async_trait::async_trait;

use super::model::Quote;
use crate::errors::Result;

/// External price oracle.
///
/// Every call may fail; implementations do not retry. An `Err` means the
/// quote is unavailable for this call and must not be replaced by a zero or
/// stale price by the caller.
#[async_trait]
pub trait QuoteSourceTrait: Send + Sync {
    /// Looks up the latest price of `symbol`. The returned quote carries a
    /// strictly positive price.
    async fn lookup(&self, symbol: &str) -> Result<Quote>;
}
