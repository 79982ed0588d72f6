//! Papertrade Market Data Crate
//!
//! This crate provides the external quote source for the papertrade ledger:
//! given a symbol, a provider returns a single best-effort last-traded price.
//!
//! # Core Types
//!
//! - [`MarketDataProvider`] - Trait implemented by every quote provider
//! - [`Quote`] - Market data quote
//! - [`MarketDataError`] - Provider failures
//!
//! Providers are treated as unreliable: every call may fail, and no retry is
//! attempted here. Callers that need resilience wrap the provider.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::Quote;
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
