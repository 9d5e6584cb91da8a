//! Markets overview state for one view (perp or spot).
//!
//! The overview owns no data source. A driver fetches, wraps each completed
//! result in a `Snapshot`, and applies it here. Snapshots older than the last
//! applied one are ignored. Every applied snapshot re-partitions, re-derives
//! and re-sorts with the current sort state.

use marketview_common::error::{MarketviewError, MarketviewResult};
use marketview_common::types::{MarketInfo, MarketKind, PriceHistoryEntry, Snapshot};
use marketview_types::config::PrecisionConfig;
use tracing::{debug, warn};

use crate::derive::{derive_all, EnrichedMarketRow, PriceHistoryIndex};
use crate::partition::{partition, PartitionReport};
use crate::sort_key::SortKey;
use crate::sortable::{SortState, SortableCollection};

pub struct MarketOverview {
    kind: MarketKind,
    precision: PrecisionConfig,
    feed: Vec<MarketInfo>,
    feed_seq: Option<u64>,
    history: PriceHistoryIndex,
    history_seq: Option<u64>,
    report: PartitionReport,
    rows: SortableCollection<EnrichedMarketRow, SortKey>,
}

impl MarketOverview {
    pub fn new(kind: MarketKind, precision: PrecisionConfig) -> Self {
        Self {
            kind,
            precision,
            feed: Vec::new(),
            feed_seq: None,
            history: PriceHistoryIndex::default(),
            history_seq: None,
            report: PartitionReport::default(),
            rows: SortableCollection::new(Vec::new()),
        }
    }

    pub fn kind(&self) -> MarketKind {
        self.kind
    }

    /// Rows in display order.
    pub fn items(&self) -> impl ExactSizeIterator<Item = &EnrichedMarketRow> + '_ {
        self.rows.items()
    }

    pub fn sort_state(&self) -> SortState<SortKey> {
        self.rows.sort_state()
    }

    /// Classification anomalies from the last applied feed.
    pub fn partition_report(&self) -> &PartitionReport {
        &self.report
    }

    /// True once a snapshot with at least one symbol has been applied.
    pub fn has_price_history(&self) -> bool {
        !self.history.is_empty()
    }

    /// Apply a market feed snapshot. Returns false if it was stale.
    pub fn apply_markets(&mut self, snapshot: Snapshot<Vec<MarketInfo>>) -> bool {
        if is_stale(self.feed_seq, snapshot.seq) {
            warn!(
                seq = snapshot.seq,
                latest = ?self.feed_seq,
                "ignoring stale market feed snapshot"
            );
            return false;
        }
        self.feed_seq = Some(snapshot.seq);
        self.feed = snapshot.data;
        self.rederive();
        true
    }

    /// Apply a price-history snapshot. Returns false if it was stale.
    pub fn apply_price_history(&mut self, snapshot: Snapshot<Vec<PriceHistoryEntry>>) -> bool {
        if is_stale(self.history_seq, snapshot.seq) {
            warn!(
                seq = snapshot.seq,
                latest = ?self.history_seq,
                "ignoring stale price history snapshot"
            );
            return false;
        }
        self.history_seq = Some(snapshot.seq);
        self.history = PriceHistoryIndex::new(snapshot.data);
        self.rederive();
        true
    }

    /// Call `trigger` while the price history is empty, including after an
    /// empty snapshot was applied. Returns whether it was called.
    pub fn ensure_price_history<F: FnOnce()>(&self, trigger: F) -> bool {
        if self.has_price_history() {
            return false;
        }
        debug!(kind = %self.kind, "price history missing, requesting fetch");
        trigger();
        true
    }

    /// Sort by `key`, toggling direction if it is already active.
    pub fn request_sort(&mut self, key: SortKey) -> MarketviewResult<SortState<SortKey>> {
        if !key.supports(self.kind) {
            return Err(MarketviewError::SortKeyUnsupported {
                key: key.to_string(),
                kind: self.kind.to_string(),
            });
        }
        let state = self.rows.request_sort(key);
        debug!(key = %key, direction = ?state.direction(), "sort requested");
        Ok(state)
    }

    fn rederive(&mut self) {
        let partitioned = partition(&self.feed);
        for name in &partitioned.report.ambiguous {
            warn!(market = %name, "market name matches both PERP and USDC; listed in both views");
        }
        for name in &partitioned.report.unclassified {
            warn!(market = %name, "market name matches neither PERP nor USDC; not listed");
        }
        self.report = partitioned.report.clone();

        let markets = partitioned.into_kind(self.kind);
        let rows = derive_all(&markets, &self.history, &self.precision);
        debug!(
            kind = %self.kind,
            rows = rows.len(),
            history = self.history.len(),
            "re-derived markets"
        );
        self.rows.replace_rows(rows);
    }
}

fn is_stale(latest: Option<u64>, seq: u64) -> bool {
    matches!(latest, Some(l) if seq < l)
}
