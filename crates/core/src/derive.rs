//! Per-market derived display data.
//!
//! `derive` is the single place fields are computed; the table and card
//! layouts both read the resulting `EnrichedMarketRow`.

use std::collections::HashMap;

use marketview_common::constants::HOURS_PER_YEAR;
use marketview_common::types::{MarketInfo, PriceHistoryEntry, PricePoint};
use marketview_types::config::PrecisionConfig;
use marketview_utils::format::{format_or_fallback, format_percent_value, format_quantity};
use serde::Serialize;

use crate::sort_key::SortKey;
use crate::sortable::{SortField, SortValue};

/// Price history keyed by base symbol.
///
/// If the source lists a symbol twice, the first entry wins.
#[derive(Debug, Clone, Default)]
pub struct PriceHistoryIndex {
    by_symbol: HashMap<String, Vec<PricePoint>>,
}

impl PriceHistoryIndex {
    pub fn new(entries: Vec<PriceHistoryEntry>) -> Self {
        entries.into_iter().collect()
    }

    pub fn get(&self, symbol: &str) -> Option<&[PricePoint]> {
        self.by_symbol.get(symbol).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.by_symbol.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_symbol.is_empty()
    }
}

impl FromIterator<PriceHistoryEntry> for PriceHistoryIndex {
    fn from_iter<I: IntoIterator<Item = PriceHistoryEntry>>(iter: I) -> Self {
        let mut by_symbol = HashMap::new();
        for entry in iter {
            by_symbol.entry(entry.symbol).or_insert(entry.prices);
        }
        Self { by_symbol }
    }
}

/// Which display fields have data. `false` renders the fallback sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FieldAvailability {
    pub last: bool,
    pub change24h: bool,
    pub volume_usd24h: bool,
    pub funding: bool,
    pub open_interest_usd: bool,
    pub open_interest: bool,
    pub price_series: bool,
}

/// A market plus everything computed for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedMarketRow {
    pub market: MarketInfo,
    /// Annualized funding rounded to 2 decimals, in percent.
    pub funding_apr_pct: Option<f64>,
    /// `"0.88%"`, or the sentinel when funding is absent.
    pub funding_apr: String,
    /// `None`: no history for this symbol. `Some(empty)`: nothing to plot.
    pub price_series: Option<Vec<PricePoint>>,
    /// Open-interest quantity rounded with the symbol's precision.
    pub open_interest_display: Option<String>,
    pub availability: FieldAvailability,
}

impl EnrichedMarketRow {
    pub fn name(&self) -> &str {
        &self.market.name
    }

    pub fn base_symbol(&self) -> &str {
        &self.market.base_symbol
    }

    /// Deep link to the per-market view.
    pub fn href(&self) -> String {
        format!("/?name={}", self.market.name)
    }

    /// Icon asset key.
    pub fn icon_key(&self) -> String {
        self.market.base_symbol.to_lowercase()
    }
}

impl SortField<SortKey> for EnrichedMarketRow {
    fn sort_value(&self, key: SortKey) -> SortValue<'_> {
        match key {
            SortKey::Name => SortValue::text(&self.market.name),
            SortKey::Last => SortValue::number(self.market.last),
            SortKey::Change24h => SortValue::number(self.market.change24h),
            SortKey::VolumeUsd24h => SortValue::number(self.market.volume_usd24h),
            SortKey::Funding1h => SortValue::number(self.market.funding1h),
            SortKey::OpenInterestUsd => SortValue::number(self.market.open_interest_usd),
        }
    }
}

/// Hourly funding → annual percentage, rounded to 2 decimals.
pub fn annualize_funding(funding1h: f64) -> f64 {
    (funding1h * HOURS_PER_YEAR * 100.0).round() / 100.0
}

/// Enrich one market with funding APR, its price series and display
/// precision.
pub fn derive(
    record: &MarketInfo,
    history: &PriceHistoryIndex,
    precision: &PrecisionConfig,
) -> EnrichedMarketRow {
    let funding_apr_pct = record.funding1h.map(annualize_funding);
    let funding_apr = format_or_fallback(funding_apr_pct, format_percent_value);

    let price_series = history.get(&record.base_symbol).map(<[PricePoint]>::to_vec);

    let digits = precision.contract_precision(&record.base_symbol);
    let open_interest_display = record.open_interest.map(|q| format_quantity(q, digits));

    let availability = FieldAvailability {
        last: record.last.is_some(),
        change24h: record.change24h.is_some(),
        volume_usd24h: record.volume_usd24h.is_some(),
        funding: record.funding1h.is_some(),
        open_interest_usd: record.open_interest_usd.is_some(),
        open_interest: record.open_interest.is_some(),
        price_series: price_series.is_some(),
    };

    EnrichedMarketRow {
        market: record.clone(),
        funding_apr_pct,
        funding_apr,
        price_series,
        open_interest_display,
        availability,
    }
}

/// Derive every market in order.
pub fn derive_all(
    markets: &[MarketInfo],
    history: &PriceHistoryIndex,
    precision: &PrecisionConfig,
) -> Vec<EnrichedMarketRow> {
    markets
        .iter()
        .map(|m| derive(m, history, precision))
        .collect()
}
