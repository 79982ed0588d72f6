/// Decimal precision for derived statistics (percent change)
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for quoted prices (cents)
pub const PRICE_PRECISION: u32 = 2;
