//! Market data provider abstractions and implementations.
//!
//! This module contains:
//! - The `MarketDataProvider` trait that all providers implement
//! - Concrete provider implementations (Yahoo)

mod traits;

pub mod yahoo;

// Re-exports
pub use traits::MarketDataProvider;
