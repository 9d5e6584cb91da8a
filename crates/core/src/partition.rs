//! Split the raw market feed into perp and spot markets.
//!
//! The two partitions are independent filters: a name containing `PERP` is a
//! perp market, a name containing `USDC` is a spot market. A name containing
//! both lands in both partitions, a name containing neither in none. Both
//! cases are reported so the caller can log them.

use std::cmp::Ordering;

use marketview_common::types::{MarketInfo, MarketKind};

use crate::sortable::{compare, SortDirection, SortValue};

/// Names that did not classify cleanly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartitionReport {
    /// Matched both markers; present in both partitions.
    pub ambiguous: Vec<String>,
    /// Matched neither marker; present in no partition.
    pub unclassified: Vec<String>,
}

impl PartitionReport {
    pub fn is_clean(&self) -> bool {
        self.ambiguous.is_empty() && self.unclassified.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Partitioned {
    pub perp: Vec<MarketInfo>,
    pub spot: Vec<MarketInfo>,
    pub report: PartitionReport,
}

impl Partitioned {
    pub fn into_kind(self, kind: MarketKind) -> Vec<MarketInfo> {
        match kind {
            MarketKind::Perp => self.perp,
            MarketKind::Spot => self.spot,
        }
    }
}

/// Descending 24h volume; absent (or NaN) volume sorts last.
///
/// Reverses the ascending column comparator, so missing values move from
/// the front to the back and ties stay `Equal`.
pub fn volume_desc(a: &MarketInfo, b: &MarketInfo) -> Ordering {
    compare(
        SortValue::number(a.volume_usd24h),
        SortValue::number(b.volume_usd24h),
        SortDirection::Ascending,
    )
    .reverse()
}

/// Markets of one kind, in default (descending volume) order.
pub fn select(feed: &[MarketInfo], kind: MarketKind) -> Vec<MarketInfo> {
    let mut markets: Vec<MarketInfo> = feed
        .iter()
        .filter(|m| kind.matches(&m.name))
        .cloned()
        .collect();
    markets.sort_by(volume_desc);
    markets
}

/// Partition the feed into perp and spot markets, each in default order.
pub fn partition(feed: &[MarketInfo]) -> Partitioned {
    let mut report = PartitionReport::default();
    for m in feed {
        match (MarketKind::Perp.matches(&m.name), MarketKind::Spot.matches(&m.name)) {
            (true, true) => report.ambiguous.push(m.name.clone()),
            (false, false) => report.unclassified.push(m.name.clone()),
            _ => {}
        }
    }

    Partitioned {
        perp: select(feed, MarketKind::Perp),
        spot: select(feed, MarketKind::Spot),
        report,
    }
}
