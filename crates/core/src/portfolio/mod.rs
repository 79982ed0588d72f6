//! Portfolio valuation and performance analysis.

pub mod performance;
pub mod valuation;

pub use performance::*;
pub use valuation::*;
