/// Decimal precision for valuation calculations
pub const DECIMAL_PRECISION: u32 = 6;

/// Decimal precision for display
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Sector bucket assigned when master data cannot resolve a ticker
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Default lookback window for portfolio history reads
pub const DEFAULT_HISTORY_LIMIT: i64 = 90;

/// Date format used for snapshot and buy dates stored as text
pub const DATE_FORMAT: &str = "%Y-%m-%d";
