//! Universal error types for marketview.
//!
//! The derivation core has no failure paths: missing data is a data state,
//! not an error. These variants cover the collaborators around it (feed and
//! price-history sources, config loading, sort-key parsing).

use thiserror::Error;

/// Top-level error type for all marketview operations.
#[derive(Debug, Error)]
pub enum MarketviewError {
    #[error("Market feed error ({source_name}): {message}")]
    Feed {
        source_name: String,
        message: String,
    },

    #[error("Price history error ({source_name}): {message}")]
    PriceHistory {
        source_name: String,
        message: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unknown sort key: {0}")]
    UnknownSortKey(String),

    #[error("Sort key {key} is not available for {kind} markets")]
    SortKeyUnsupported { key: String, kind: String },
}

impl MarketviewError {
    /// Short machine-readable code for JSON error output.
    pub fn code(&self) -> &'static str {
        match self {
            MarketviewError::Feed { .. } => "FEED_ERROR",
            MarketviewError::PriceHistory { .. } => "PRICE_HISTORY_ERROR",
            MarketviewError::Config(_) => "CONFIG_ERROR",
            MarketviewError::Io(_) => "IO_ERROR",
            MarketviewError::Parse(_) => "PARSE_ERROR",
            MarketviewError::UnknownSortKey(_) => "UNKNOWN_SORT_KEY",
            MarketviewError::SortKeyUnsupported { .. } => "SORT_KEY_UNSUPPORTED",
        }
    }
}

pub type MarketviewResult<T> = Result<T, MarketviewError>;
