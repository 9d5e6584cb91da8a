//! File-backed market feed and price-history sources.
//!
//! Both read a JSON array from disk on every call, so a file rewritten by an
//! external process shows up on the next refresh.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use marketview_common::error::{MarketviewError, MarketviewResult};
use marketview_common::traits::{MarketFeed, PriceHistorySource};
use marketview_common::types::{MarketInfo, PriceHistoryEntry};
use tracing::debug;

async fn read(path: &Path) -> MarketviewResult<String> {
    tokio::fs::read_to_string(path).await.map_err(MarketviewError::from)
}

/// Markets from a JSON file: `[{"name": "BTC-PERP", "baseSymbol": "BTC", ...}]`.
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MarketFeed for FileFeed {
    fn name(&self) -> &str {
        "file"
    }

    async fn markets(&self) -> MarketviewResult<Vec<MarketInfo>> {
        let raw = read(&self.path).await.map_err(|e| MarketviewError::Feed {
            source_name: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let markets: Vec<MarketInfo> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), count = markets.len(), "loaded market feed");
        Ok(markets)
    }
}

/// Price history from a JSON file: `[{"symbol": "BTC", "prices": [[ts, px], ...]}]`.
pub struct FilePriceHistory {
    path: PathBuf,
}

impl FilePriceHistory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PriceHistorySource for FilePriceHistory {
    fn name(&self) -> &str {
        "file"
    }

    async fn price_history(&self) -> MarketviewResult<Vec<PriceHistoryEntry>> {
        let raw = read(&self.path).await.map_err(|e| MarketviewError::PriceHistory {
            source_name: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        let entries: Vec<PriceHistoryEntry> = serde_json::from_str(&raw)?;
        debug!(path = %self.path.display(), symbols = entries.len(), "loaded price history");
        Ok(entries)
    }
}

/// Hands out snapshot sequence numbers. Take one *before* awaiting a fetch
/// so a slow, older request can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct Sequencer {
    last: AtomicU64,
}

impl Sequencer {
    pub fn next(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "marketview-src-{name}-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_file_feed_reads_markets() {
        let path = scratch_file(
            "feed",
            r#"[{"name": "BTC-PERP", "baseSymbol": "BTC", "volumeUsd24h": 500, "funding1h": 0.0002}]"#,
        );
        let markets = FileFeed::new(&path).markets().await.unwrap();
        assert_eq!(markets.len(), 1);
        assert_eq!(markets[0].funding1h, Some(0.0002));
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_file_feed_missing_file() {
        let err = FileFeed::new("/nonexistent/marketview/feed.json")
            .markets()
            .await
            .unwrap_err();
        assert!(matches!(err, MarketviewError::Feed { .. }));
    }

    #[tokio::test]
    async fn test_file_feed_bad_json() {
        let path = scratch_file("bad", "{not json");
        let err = FileFeed::new(&path).markets().await.unwrap_err();
        assert!(matches!(err, MarketviewError::Parse(_)));
        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_file_price_history() {
        let path = scratch_file("prices", r#"[{"symbol": "ETH", "prices": [[1, 2900.0], [2, 2950.5]]}]"#);
        let entries = FilePriceHistory::new(&path).price_history().await.unwrap();
        assert_eq!(entries[0].symbol, "ETH");
        assert_eq!(entries[0].prices.len(), 2);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_sequencer_increments() {
        let seq = Sequencer::default();
        assert_eq!(seq.next(), 1);
        assert_eq!(seq.next(), 2);
    }
}
