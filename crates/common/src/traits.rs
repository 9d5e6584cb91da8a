//! Source traits: the contract between the overview and its data feeds.
//!
//! The overview core never calls these itself. A driver (the CLI, a UI loop)
//! awaits a source, wraps the completed result in a `Snapshot`, and hands it
//! to the core.

use async_trait::async_trait;

use crate::error::MarketviewResult;
use crate::types::{MarketInfo, PriceHistoryEntry};

/// Supplies the current list of markets.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Source identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Fetch the latest market list. `name`/`base_symbol` identity is stable
    /// across calls.
    async fn markets(&self) -> MarketviewResult<Vec<MarketInfo>>;
}

/// Supplies recent price history per base asset.
#[async_trait]
pub trait PriceHistorySource: Send + Sync {
    fn name(&self) -> &str;

    /// Fetch history for every symbol the source knows about.
    async fn price_history(&self) -> MarketviewResult<Vec<PriceHistoryEntry>>;
}

/// A feed backed by a fixed list. Useful for tests and demos.
pub struct StaticFeed {
    pub markets: Vec<MarketInfo>,
}

#[async_trait]
impl MarketFeed for StaticFeed {
    fn name(&self) -> &str {
        "static"
    }

    async fn markets(&self) -> MarketviewResult<Vec<MarketInfo>> {
        Ok(self.markets.clone())
    }
}

/// A price-history source backed by a fixed list.
pub struct StaticPriceHistory {
    pub entries: Vec<PriceHistoryEntry>,
}

#[async_trait]
impl PriceHistorySource for StaticPriceHistory {
    fn name(&self) -> &str {
        "static"
    }

    async fn price_history(&self) -> MarketviewResult<Vec<PriceHistoryEntry>> {
        Ok(self.entries.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_feed_returns_markets() {
        let feed = StaticFeed {
            markets: vec![MarketInfo::new("BTC-PERP", "BTC")],
        };
        let markets = feed.markets().await.unwrap();
        assert_eq!(markets.len(), 1);
        assert_eq!(feed.name(), "static");
    }

    #[tokio::test]
    async fn test_static_price_history_as_trait_object() {
        let source: Box<dyn PriceHistorySource> = Box::new(StaticPriceHistory {
            entries: vec![PriceHistoryEntry {
                symbol: "BTC".into(),
                prices: vec![],
            }],
        });
        let entries = source.price_history().await.unwrap();
        assert_eq!(entries[0].symbol, "BTC");
    }
}
