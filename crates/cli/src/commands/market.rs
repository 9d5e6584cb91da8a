use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use marketview_common::traits::{MarketFeed, PriceHistorySource};
use marketview_common::types::{MarketKind, Snapshot};
use marketview_core::presentation;
use marketview_core::{MarketOverview, SortKey};
use marketview_types::config::{AppConfig, Layout};
use marketview_utils::output::{render, OutputFormat};
use tracing::{info, warn};

use crate::sources::{FileFeed, FilePriceHistory, Sequencer};

/// Options for `marketview markets`.
pub struct MarketsArgs {
    pub feed: PathBuf,
    pub prices: Option<PathBuf>,
    pub kind: Option<MarketKind>,
    pub sort: Vec<String>,
    pub layout: Option<Layout>,
    pub width: Option<usize>,
    pub watch: Option<u64>,
}

/// Feed + price-history sources and their snapshot counters.
struct Driver {
    feed: Box<dyn MarketFeed>,
    prices: Option<Box<dyn PriceHistorySource>>,
    feed_seq: Sequencer,
    prices_seq: Sequencer,
}

impl Driver {
    async fn refresh_markets(&self, overview: &mut MarketOverview) -> Result<()> {
        let seq = self.feed_seq.next();
        let markets = self
            .feed
            .markets()
            .await
            .with_context(|| format!("Failed to load markets from {} feed", self.feed.name()))?;
        overview.apply_markets(Snapshot::new(seq, markets));
        Ok(())
    }

    /// Fetch price history only if the overview asks for it.
    async fn ensure_price_history(&self, overview: &mut MarketOverview) {
        let Some(source) = &self.prices else {
            return;
        };
        let mut requested = false;
        overview.ensure_price_history(|| requested = true);
        if !requested {
            return;
        }

        let seq = self.prices_seq.next();
        match source.price_history().await {
            Ok(entries) => {
                overview.apply_price_history(Snapshot::new(seq, entries));
            }
            // Sparklines fall back to "unavailable"; the table still renders.
            Err(e) => warn!("price history unavailable: {e}"),
        }
    }
}

fn parse_sort_keys(raw: &[String]) -> Result<Vec<SortKey>> {
    raw.iter()
        .map(|s| s.parse::<SortKey>().map_err(anyhow::Error::from))
        .collect()
}

/// `marketview markets --feed <FILE> [--prices <FILE>] [--sort KEY]...`
pub async fn markets(args: MarketsArgs, config: &AppConfig, fmt: OutputFormat) -> Result<()> {
    let kind = args.kind.unwrap_or(config.display.default_kind);
    let layout = args.layout.unwrap_or(config.display.layout);
    let width = args.width.unwrap_or(config.display.sparkline_width);
    let sort_keys = parse_sort_keys(&args.sort)?;

    let driver = Driver {
        feed: Box::new(FileFeed::new(&args.feed)),
        prices: args
            .prices
            .as_ref()
            .map(|p| Box::new(FilePriceHistory::new(p)) as Box<dyn PriceHistorySource>),
        feed_seq: Sequencer::default(),
        prices_seq: Sequencer::default(),
    };

    let mut overview = MarketOverview::new(kind, config.precision.clone());
    driver.refresh_markets(&mut overview).await?;
    driver.ensure_price_history(&mut overview).await;

    // Each --sort is one header click, in order.
    for key in sort_keys {
        overview.request_sort(key)?;
    }

    render(fmt, &presentation::render(&overview, layout, width))?;

    let Some(secs) = args.watch else {
        return Ok(());
    };

    info!(kind = %kind, secs, "watching feed");
    let mut interval = tokio::time::interval(Duration::from_secs(secs.max(1)));
    interval.tick().await;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("stopped watching");
                return Ok(());
            }
            _ = interval.tick() => {
                if let Err(e) = driver.refresh_markets(&mut overview).await {
                    warn!("{e:#}");
                    continue;
                }
                driver.ensure_price_history(&mut overview).await;
                if fmt == OutputFormat::Table {
                    println!("\nLast refresh: {}", chrono::Local::now().format("%H:%M:%S"));
                }
                render(fmt, &presentation::render(&overview, layout, width))?;
            }
        }
    }
}

/// `marketview keys [--spot]`
pub fn keys(kind: MarketKind, fmt: OutputFormat) -> Result<()> {
    render(fmt, &presentation::sort_keys(kind))
}

#[cfg(test)]
mod tests {
    use marketview_common::traits::{StaticFeed, StaticPriceHistory};
    use marketview_common::types::{MarketInfo, PriceHistoryEntry, PricePoint};
    use marketview_types::config::PrecisionConfig;

    use super::*;

    fn static_driver(prices: bool) -> Driver {
        Driver {
            feed: Box::new(StaticFeed {
                markets: vec![MarketInfo::new("BTC-PERP", "BTC")],
            }),
            prices: prices.then(|| {
                Box::new(StaticPriceHistory {
                    entries: vec![PriceHistoryEntry {
                        symbol: "BTC".into(),
                        prices: vec![PricePoint(1, 1.0), PricePoint(2, 2.0)],
                    }],
                }) as Box<dyn PriceHistorySource>
            }),
            feed_seq: Sequencer::default(),
            prices_seq: Sequencer::default(),
        }
    }

    #[tokio::test]
    async fn test_driver_fetches_price_history_once() {
        let driver = static_driver(true);
        let mut overview = MarketOverview::new(MarketKind::Perp, PrecisionConfig::default());
        driver.refresh_markets(&mut overview).await.unwrap();
        driver.ensure_price_history(&mut overview).await;
        assert!(overview.has_price_history());

        driver.refresh_markets(&mut overview).await.unwrap();
        driver.ensure_price_history(&mut overview).await;
        // Second call found history already applied and fetched nothing.
        assert_eq!(driver.prices_seq.next(), 2);
        assert_eq!(driver.feed_seq.next(), 3);
        let row = overview.items().next().unwrap();
        assert_eq!(row.price_series.as_ref().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_driver_without_price_source() {
        let driver = static_driver(false);
        let mut overview = MarketOverview::new(MarketKind::Perp, PrecisionConfig::default());
        driver.refresh_markets(&mut overview).await.unwrap();
        driver.ensure_price_history(&mut overview).await;
        assert!(!overview.has_price_history());
        assert_eq!(overview.items().len(), 1);
    }

    #[test]
    fn test_parse_sort_keys_in_order() {
        let keys = parse_sort_keys(&["last".into(), "last".into(), "volume".into()]).unwrap();
        assert_eq!(keys, vec![SortKey::Last, SortKey::Last, SortKey::VolumeUsd24h]);
    }

    #[test]
    fn test_parse_sort_keys_rejects_unknown() {
        let err = parse_sort_keys(&["leverage".into()]).unwrap_err();
        assert!(err.to_string().contains("Unknown sort key"));
    }

    #[tokio::test]
    async fn test_markets_from_files() {
        let dir = std::env::temp_dir().join(format!("marketview-cmd-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let feed = dir.join("feed.json");
        let prices = dir.join("prices.json");
        std::fs::write(
            &feed,
            r#"[
                {"name": "BTC-PERP", "baseSymbol": "BTC", "volumeUsd24h": 500, "funding1h": 0.0002},
                {"name": "ETH-PERP", "baseSymbol": "ETH", "volumeUsd24h": 900}
            ]"#,
        )
        .unwrap();
        std::fs::write(&prices, r#"[{"symbol": "BTC", "prices": [[1, 1.0], [2, 3.0]]}]"#).unwrap();

        let args = MarketsArgs {
            feed,
            prices: Some(prices),
            kind: Some(MarketKind::Perp),
            sort: vec!["name".into()],
            layout: Some(Layout::Table),
            width: None,
            watch: None,
        };
        markets(args, &AppConfig::default(), OutputFormat::Json).await.unwrap();
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_markets_spot_rejects_funding_sort() {
        let dir = std::env::temp_dir().join(format!("marketview-cmd-spot-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let feed = dir.join("feed.json");
        std::fs::write(&feed, r#"[{"name": "SOL/USDC", "baseSymbol": "SOL"}]"#).unwrap();

        let args = MarketsArgs {
            feed,
            prices: None,
            kind: Some(MarketKind::Spot),
            sort: vec!["funding1h".into()],
            layout: None,
            width: None,
            watch: None,
        };
        let err = markets(args, &AppConfig::default(), OutputFormat::Json)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not available for spot"));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
