//! Feed types shared across all crates.
//!
//! These mirror the decoded upstream payloads. Every numeric field is
//! optional: `None` means "not reported", and `Some(0.0)` is a real value.

use serde::{Deserialize, Serialize};

use crate::constants::{PERP_MARKER, SPOT_MARKER};

/// One market as reported by the market feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketInfo {
    /// Unique market name, e.g. `BTC-PERP` or `SOL/USDC`.
    pub name: String,
    pub base_symbol: String,
    /// Last traded price. Absent if the market has not traded yet.
    #[serde(default)]
    pub last: Option<f64>,
    /// 24h change as a fraction (0.05 = +5%).
    #[serde(default)]
    pub change24h: Option<f64>,
    #[serde(default)]
    pub volume_usd24h: Option<f64>,
    /// Hourly funding rate. Perp markets only.
    #[serde(default)]
    pub funding1h: Option<f64>,
    /// Open interest in base units. Perp markets only.
    #[serde(default)]
    pub open_interest: Option<f64>,
    #[serde(default)]
    pub open_interest_usd: Option<f64>,
}

impl MarketInfo {
    /// Bare record with only identity fields set.
    pub fn new(name: impl Into<String>, base_symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_symbol: base_symbol.into(),
            last: None,
            change24h: None,
            volume_usd24h: None,
            funding1h: None,
            open_interest: None,
            open_interest_usd: None,
        }
    }
}

/// Market partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketKind {
    Perp,
    Spot,
}

impl MarketKind {
    /// Substring a market name must contain to belong to this partition.
    pub fn marker(self) -> &'static str {
        match self {
            MarketKind::Perp => PERP_MARKER,
            MarketKind::Spot => SPOT_MARKER,
        }
    }

    /// Whether `name` belongs to this partition.
    pub fn matches(self, name: &str) -> bool {
        name.contains(self.marker())
    }
}

impl std::fmt::Display for MarketKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarketKind::Perp => write!(f, "perp"),
            MarketKind::Spot => write!(f, "spot"),
        }
    }
}

impl std::str::FromStr for MarketKind {
    type Err = crate::error::MarketviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "perp" | "perps" | "perpetual" => Ok(MarketKind::Perp),
            "spot" => Ok(MarketKind::Spot),
            other => Err(crate::error::MarketviewError::Config(format!(
                "unknown market kind: {other}"
            ))),
        }
    }
}

/// A single `(timestamp, price)` sample. Serialized as `[ts, price]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint(pub u64, pub f64);

impl PricePoint {
    pub fn timestamp_ms(&self) -> u64 {
        self.0
    }

    pub fn price(&self) -> f64 {
        self.1
    }
}

/// Recent price history for one base asset, ascending by time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryEntry {
    pub symbol: String,
    #[serde(default)]
    pub prices: Vec<PricePoint>,
}

/// A completed upstream result tagged with a monotonically increasing
/// sequence number. Consumers keep only the highest `seq` they have seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<T> {
    pub seq: u64,
    pub data: T,
}

impl<T> Snapshot<T> {
    pub fn new(seq: u64, data: T) -> Self {
        Self { seq, data }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_market_info_deserialize_camel_case() {
        let raw = r#"{
            "name": "BTC-PERP",
            "baseSymbol": "BTC",
            "last": 41250.5,
            "change24h": 0,
            "volumeUsd24h": 1200000,
            "funding1h": 0.0001,
            "openInterest": 12.5,
            "openInterestUsd": 515631.25
        }"#;
        let m: MarketInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(m.name, "BTC-PERP");
        assert_eq!(m.base_symbol, "BTC");
        assert_eq!(m.change24h, Some(0.0));
        assert_eq!(m.volume_usd24h, Some(1_200_000.0));
        assert_eq!(m.open_interest_usd, Some(515_631.25));
    }

    #[test]
    fn test_market_info_missing_fields_are_none() {
        let raw = r#"{"name": "SOL/USDC", "baseSymbol": "SOL", "funding1h": null}"#;
        let m: MarketInfo = serde_json::from_str(raw).unwrap();
        assert_eq!(m.last, None);
        assert_eq!(m.change24h, None);
        assert_eq!(m.funding1h, None);
    }

    #[test]
    fn test_price_history_points_as_pairs() {
        let raw = r#"{"symbol": "ETH", "prices": [[1000, 2900.5], [2000, 2950.0]]}"#;
        let h: PriceHistoryEntry = serde_json::from_str(raw).unwrap();
        assert_eq!(h.prices.len(), 2);
        assert_eq!(h.prices[0].timestamp_ms(), 1000);
        assert_eq!(h.prices[1].price(), 2950.0);
    }

    #[test]
    fn test_market_kind_matches_marker() {
        assert!(MarketKind::Perp.matches("BTC-PERP"));
        assert!(!MarketKind::Perp.matches("BTC/USDC"));
        assert!(MarketKind::Spot.matches("BTC/USDC"));
        assert!(!MarketKind::Spot.matches("MNGO/USDT"));
    }

    #[test]
    fn test_market_kind_from_str() {
        assert_eq!("perp".parse::<MarketKind>().unwrap(), MarketKind::Perp);
        assert_eq!("SPOT".parse::<MarketKind>().unwrap(), MarketKind::Spot);
        assert!("futures".parse::<MarketKind>().is_err());
    }
}
