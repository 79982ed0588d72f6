//! Quote source module.
//!
//! - [`model`] - The `Quote` domain model
//! - [`source`] - `QuoteSourceTrait`, the external price oracle contract
//! - [`client`] - Facade implementing the contract over the market-data crate
//! - [`cache`] - Per-call memo so one operation looks each symbol up once
//!
//! ```text
//! TradeService / ValuationService ─▶ QuoteCache ─▶ QuoteSourceTrait
//!                                                       │
//!                                          MarketDataClient ─▶ market-data crate
//! ```

pub mod cache;
pub mod client;
pub mod model;
pub mod source;

pub use cache::QuoteCache;
pub use client::MarketDataClient;
pub use model::Quote;
pub use source::QuoteSourceTrait;
