//! Trade processor - quote, validate, then commit through the ledger store.

mod trading_service;
mod trading_traits;


pub use trading_service::TradeService;
pub use trading_traits::TradeServiceTrait;
