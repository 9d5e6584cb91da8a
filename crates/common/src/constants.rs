//! Universal constants for marketview.

/// Text substituted for any display field whose value is absent.
pub const UNAVAILABLE: &str = "unavailable";

/// Substring marking a perpetual market name (e.g. `BTC-PERP`).
pub const PERP_MARKER: &str = "PERP";

/// Substring marking a spot market name (e.g. `BTC/USDC`).
pub const SPOT_MARKER: &str = "USDC";

/// Hourly funding → annual rate multiplier (24 × 365).
pub const HOURS_PER_YEAR: f64 = 24.0 * 365.0;

/// Decimal places for unit prices (`$41,250.50`).
pub const UNIT_PRICE_DECIMALS: usize = 2;

/// Decimal places for aggregate USD magnitudes (`$1,234,567`).
pub const AGGREGATE_USD_DECIMALS: usize = 0;

/// Decimal places for percentages (`-3.25%`).
pub const PCT_DECIMALS: usize = 2;

/// Decimal places for the raw hourly funding rate (`0.0012%`).
pub const FUNDING_1H_DECIMALS: usize = 4;
