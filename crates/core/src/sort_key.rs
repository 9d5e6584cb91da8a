//! Sortable market columns.

use std::str::FromStr;

use marketview_common::error::MarketviewError;
use marketview_common::types::MarketKind;
use serde::{Deserialize, Serialize};

/// A column the user can sort the markets view by.
///
/// Wire names match the feed's field names (`volumeUsd24h`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    Name,
    Last,
    Change24h,
    VolumeUsd24h,
    Funding1h,
    OpenInterestUsd,
}

const PERP_KEYS: &[SortKey] = &[
    SortKey::Name,
    SortKey::Last,
    SortKey::Change24h,
    SortKey::VolumeUsd24h,
    SortKey::Funding1h,
    SortKey::OpenInterestUsd,
];

const SPOT_KEYS: &[SortKey] = &[
    SortKey::Name,
    SortKey::Last,
    SortKey::Change24h,
    SortKey::VolumeUsd24h,
];

impl SortKey {
    /// Columns shown, in display order, for a market kind.
    pub fn for_kind(kind: MarketKind) -> &'static [SortKey] {
        match kind {
            MarketKind::Perp => PERP_KEYS,
            MarketKind::Spot => SPOT_KEYS,
        }
    }

    /// Funding and open interest exist only for perps.
    pub fn supports(self, kind: MarketKind) -> bool {
        Self::for_kind(kind).contains(&self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Last => "last",
            SortKey::Change24h => "change24h",
            SortKey::VolumeUsd24h => "volumeUsd24h",
            SortKey::Funding1h => "funding1h",
            SortKey::OpenInterestUsd => "openInterestUsd",
        }
    }

    /// Column header text.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Name => "Market",
            SortKey::Last => "Price",
            SortKey::Change24h => "24h Change",
            SortKey::VolumeUsd24h => "24h Volume",
            SortKey::Funding1h => "Funding",
            SortKey::OpenInterestUsd => "Open Interest",
        }
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = MarketviewError;

    /// Accepts the wire name in any case, plus snake_case and a few aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "name" | "market" => Ok(SortKey::Name),
            "last" | "price" => Ok(SortKey::Last),
            "change24h" | "change" => Ok(SortKey::Change24h),
            "volumeusd24h" | "volume" => Ok(SortKey::VolumeUsd24h),
            "funding1h" | "funding" => Ok(SortKey::Funding1h),
            "openinterestusd" | "openinterest" | "oi" => Ok(SortKey::OpenInterestUsd),
            _ => Err(MarketviewError::UnknownSortKey(s.to_string())),
        }
    }
}
