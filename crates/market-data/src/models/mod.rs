//! Market data models
//!
//! - `quote` - Quote data structure returned by providers

mod quote;

pub use quote::Quote;
