mod commands;
mod sources;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use marketview_common::error::MarketviewError;
use marketview_common::types::MarketKind;
use marketview_types::config::{AppConfig, Layout};
use marketview_utils::output::OutputFormat;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use commands::market::MarketsArgs;

#[derive(Parser)]
#[command(
    name = "marketview",
    about = "Marketview — perpetual and spot market overview.\nSortable tables and cards from a market feed, with sparklines and funding APR.",
    version,
    propagate_version = true
)]
struct Cli {
    #[arg(long, short = 'o', global = true, default_value = "table")]
    output: CliOutputFormat,

    /// Debug logging (overrides `general.verbose`).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat { Table, Json, JsonPretty }

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> OutputFormat {
        match f {
            CliOutputFormat::Table => OutputFormat::Table,
            CliOutputFormat::Json => OutputFormat::Json,
            CliOutputFormat::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliLayout { Table, Card }

impl From<CliLayout> for Layout {
    fn from(l: CliLayout) -> Layout {
        match l {
            CliLayout::Table => Layout::Table,
            CliLayout::Card => Layout::Card,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
//  TOP-LEVEL
// ═══════════════════════════════════════════════════════════════════════

#[derive(Subcommand)]
enum Commands {
    /// Show the market overview for one kind (perp by default).
    Markets {
        /// JSON file with the market feed.
        #[arg(long)]
        feed: PathBuf,

        /// JSON file with per-symbol price history (sparklines).
        #[arg(long)]
        prices: Option<PathBuf>,

        /// Show spot markets.
        #[arg(long, conflicts_with = "perp")]
        spot: bool,

        /// Show perpetual markets.
        #[arg(long)]
        perp: bool,

        /// Sort key; repeat to click the same header again (e.g. --sort last --sort last).
        #[arg(long, short = 's')]
        sort: Vec<String>,

        /// Table rows or mobile cards.
        #[arg(long)]
        layout: Option<CliLayout>,

        /// Sparkline width in characters.
        #[arg(long)]
        width: Option<usize>,

        /// Re-read the feed every N seconds until Ctrl-C.
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },

    /// List sort keys for a market kind.
    Keys {
        #[arg(long, default_value_t = false)]
        spot: bool,
    },

    /// Show or edit `~/.marketview/config.toml`.
    #[command(alias = "config")]
    Configure {
        #[command(subcommand)]
        action: ConfigureAction,
    },
}

#[derive(Subcommand)]
enum ConfigureAction {
    /// Show all current configuration.
    Show,
    /// Default layout: table or card.
    Layout { value: String },
    /// Default market kind: perp or spot.
    Kind { value: String },
    /// Open-interest fraction digits for a base symbol.
    Precision { symbol: String, digits: u32 },
    /// Toggle verbose mode.
    Verbose { enabled: bool },
    /// Default sparkline width.
    SparklineWidth { width: usize },
}

// ═══════════════════════════════════════════════════════════════════════
//  ENTRYPOINT
// ═══════════════════════════════════════════════════════════════════════

fn selected_kind(spot: bool, perp: bool) -> Option<MarketKind> {
    match (spot, perp) {
        (true, _) => Some(MarketKind::Spot),
        (_, true) => Some(MarketKind::Perp),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let fmt: OutputFormat = cli.output.into();

    let config = match marketview_core::init_workspace()
        .and_then(|_| marketview_core::workspace::load_config())
    {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("warning: {e:#}; using default config");
            None
        }
    };
    let config_missing = config.is_none();
    let config = config.unwrap_or_default();

    let default_level = if cli.verbose || config.general.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
    if config_missing {
        warn!("running without a config file");
    }

    if let Err(e) = run(cli.command, &config, fmt).await {
        if fmt != OutputFormat::Table {
            let code = e
                .downcast_ref::<MarketviewError>()
                .map_or("UNKNOWN", MarketviewError::code);
            println!("{}", serde_json::json!({ "error": format!("{e:#}"), "code": code }));
            std::process::exit(1);
        }
        return Err(e);
    }
    Ok(())
}

async fn run(command: Commands, config: &AppConfig, fmt: OutputFormat) -> Result<()> {
    match command {
        Commands::Markets { feed, prices, spot, perp, sort, layout, width, watch } => {
            let args = MarketsArgs {
                feed,
                prices,
                kind: selected_kind(spot, perp),
                sort,
                layout: layout.map(Layout::from),
                width,
                watch,
            };
            commands::market::markets(args, config, fmt).await
        }

        Commands::Keys { spot } => {
            let kind = if spot { MarketKind::Spot } else { MarketKind::Perp };
            commands::market::keys(kind, fmt)
        }

        Commands::Configure { action } => match action {
            ConfigureAction::Show => commands::configure::show(config, fmt),
            ConfigureAction::Layout { value } => commands::configure::set_layout(&value),
            ConfigureAction::Kind { value } => commands::configure::set_kind(&value),
            ConfigureAction::Precision { symbol, digits } => {
                commands::configure::set_precision(&symbol, digits)
            }
            ConfigureAction::Verbose { enabled } => commands::configure::set_verbose(enabled),
            ConfigureAction::SparklineWidth { width } => {
                commands::configure::set_sparkline_width(width)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_repeated_sort() {
        let cli = Cli::try_parse_from([
            "marketview", "markets", "--feed", "f.json", "--sort", "last", "--sort", "last",
        ])
        .unwrap();
        match cli.command {
            Commands::Markets { sort, spot, .. } => {
                assert_eq!(sort, vec!["last", "last"]);
                assert!(!spot);
            }
            _ => panic!("expected markets"),
        }
    }

    #[test]
    fn test_cli_spot_and_perp_conflict() {
        assert!(Cli::try_parse_from(["marketview", "markets", "--feed", "f", "--spot", "--perp"]).is_err());
    }

    #[test]
    fn test_selected_kind() {
        assert_eq!(selected_kind(true, false), Some(MarketKind::Spot));
        assert_eq!(selected_kind(false, true), Some(MarketKind::Perp));
        assert_eq!(selected_kind(false, false), None);
    }

    #[test]
    fn test_config_alias() {
        assert!(Cli::try_parse_from(["marketview", "config", "show"]).is_ok());
    }
}
