use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Cash credited to a newly registered account
pub const DEFAULT_STARTING_CASH: Decimal = dec!(10000.00);

/// Longest accepted username
pub const MAX_USERNAME_LEN: usize = 64;
