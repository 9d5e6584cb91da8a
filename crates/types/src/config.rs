use std::collections::HashMap;

use marketview_common::types::MarketKind;
use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `$HOME/.marketview/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub display: DisplayConfig,
    pub precision: PrecisionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose tracing output.
    pub verbose: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Which partition `marketview markets` shows without `--spot`/`--perp`.
    #[serde(default = "default_kind")]
    pub default_kind: MarketKind,
    /// Wide table rows or compact cards.
    #[serde(default = "default_layout")]
    pub layout: Layout,
    /// Number of columns a sparkline is squeezed into.
    #[serde(default = "default_sparkline_width")]
    pub sparkline_width: usize,
}

/// Presentation layout. Both layouts render the same derived rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Desktop-style table: one row per market, every column.
    Table,
    /// Mobile-style card: name, change, price, sparkline, APR.
    Card,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Table => write!(f, "table"),
            Layout::Card => write!(f, "card"),
        }
    }
}

/// Open-interest display precision per base asset.
///
/// Value = maximum fractional digits shown for the open-interest quantity.
/// Symbols missing from the table are shown at full precision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecisionConfig {
    #[serde(default)]
    pub contracts: HashMap<String, u32>,
}

impl PrecisionConfig {
    /// Fractional digits for `symbol`, if the table has an entry.
    pub fn contract_precision(&self, symbol: &str) -> Option<u32> {
        self.contracts.get(symbol).copied()
    }
}

impl Default for PrecisionConfig {
    fn default() -> Self {
        let mut contracts = HashMap::new();
        contracts.insert("BTC".to_string(), 4);
        contracts.insert("ETH".to_string(), 3);
        contracts.insert("SOL".to_string(), 2);
        contracts.insert("SRM".to_string(), 1);
        contracts.insert("RAY".to_string(), 1);
        contracts.insert("MNGO".to_string(), 0);
        contracts.insert("FTT".to_string(), 1);
        contracts.insert("ADA".to_string(), 0);
        contracts.insert("BNB".to_string(), 3);
        contracts.insert("AVAX".to_string(), 2);
        contracts.insert("LUNA".to_string(), 2);
        contracts.insert("GMT".to_string(), 0);
        Self { contracts }
    }
}

fn default_kind() -> MarketKind {
    MarketKind::Perp
}

fn default_layout() -> Layout {
    Layout::Table
}

fn default_sparkline_width() -> usize {
    24
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            default_kind: default_kind(),
            layout: default_layout(),
            sparkline_width: default_sparkline_width(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig { verbose: false },
            display: DisplayConfig::default(),
            precision: PrecisionConfig::default(),
        }
    }
}

impl AppConfig {
    /// Serialize to TOML for writing to disk.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Deserialize from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }
}
