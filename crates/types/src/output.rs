//! Structured output types for JSON/table rendering.
//!
//! The presentation adapter maps derived rows into these. They all derive
//! `Serialize` for JSON output; table/card rendering lives in
//! `marketview_utils::output`.

use marketview_common::types::MarketKind;
use serde::Serialize;

use crate::config::Layout;

// ─── Cells ──────────────────────────────────────────────────────────

/// A rendered value plus whether the underlying data was present.
///
/// When `available` is false, `text` is the fallback sentinel. Consumers
/// branch on the flag instead of comparing strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayField {
    pub text: String,
    pub available: bool,
}

impl DisplayField {
    pub fn present(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            available: true,
        }
    }

    pub fn unavailable(sentinel: &str) -> Self {
        Self {
            text: sentinel.to_string(),
            available: false,
        }
    }
}

/// Color semantics for signed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    /// Value `>= 0` (zero counts as non-negative).
    Positive,
    Negative,
    /// No value to color.
    Muted,
}

/// Arrow shown next to a column header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortIndicator {
    None,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn arrow(self) -> &'static str {
        match self {
            SortIndicator::None => "",
            SortIndicator::Ascending => "▲",
            SortIndicator::Descending => "▼",
        }
    }
}

// ─── Markets view ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct ColumnHeader {
    /// Sort key requested when this header is activated.
    pub key: String,
    pub label: String,
    pub indicator: SortIndicator,
}

/// Open interest: USD aggregate with the base quantity beneath it.
#[derive(Debug, Clone, Serialize)]
pub struct OpenInterestCell {
    pub usd: DisplayField,
    /// `"1.2346 BTC"`; `None` when the quantity is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
}

/// One desktop table row.
#[derive(Debug, Clone, Serialize)]
pub struct TableRowOutput {
    pub name: String,
    /// Deep link to the per-market detail view.
    pub href: String,
    /// Icon asset key (lowercased base symbol).
    pub icon: String,
    pub price: DisplayField,
    pub sparkline: DisplayField,
    pub change_24h: DisplayField,
    pub change_tone: Tone,
    pub volume_24h: DisplayField,
    /// `"0.0001% (0.88% APR)"`. Perp view only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding: Option<DisplayField>,
    /// Perp view only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<OpenInterestCell>,
}

/// One mobile card.
#[derive(Debug, Clone, Serialize)]
pub struct CardOutput {
    pub name: String,
    pub href: String,
    pub icon: String,
    pub price: DisplayField,
    pub change_24h: DisplayField,
    pub change_tone: Tone,
    pub sparkline: DisplayField,
    /// `"0.88% APR"`. Perp view only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_apr: Option<DisplayField>,
}

/// Active sort as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SortStateOutput {
    pub key: Option<String>,
    pub direction: Option<String>,
}

/// Full markets view for one render pass.
#[derive(Debug, Clone, Serialize)]
pub struct MarketsOutput {
    pub kind: MarketKind,
    pub layout: Layout,
    pub sort: SortStateOutput,
    pub columns: Vec<ColumnHeader>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub rows: Vec<TableRowOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cards: Vec<CardOutput>,
}

impl MarketsOutput {
    /// Number of markets in the view, whichever layout is active.
    pub fn len(&self) -> usize {
        match self.layout {
            Layout::Table => self.rows.len(),
            Layout::Card => self.cards.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─── Sort keys ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SortKeysOutput {
    pub kind: MarketKind,
    pub keys: Vec<SortKeyRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SortKeyRow {
    pub key: String,
    pub label: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_field_serializes_flag() {
        let field = DisplayField::unavailable("unavailable");
        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["text"], "unavailable");
        assert_eq!(json["available"], false);
    }

    #[test]
    fn test_perp_only_cells_omitted_when_none() {
        let row = TableRowOutput {
            name: "SOL/USDC".into(),
            href: "/?name=SOL/USDC".into(),
            icon: "sol".into(),
            price: DisplayField::present("$101.25"),
            sparkline: DisplayField::unavailable("unavailable"),
            change_24h: DisplayField::present("0.00%"),
            change_tone: Tone::Positive,
            volume_24h: DisplayField::present("$5,000"),
            funding: None,
            open_interest: None,
        };
        let json = serde_json::to_value(&row).unwrap();
        assert!(json.get("funding").is_none());
        assert!(json.get("open_interest").is_none());
        assert_eq!(json["change_tone"], "positive");
    }

    #[test]
    fn test_markets_output_len_follows_layout() {
        let output = MarketsOutput {
            kind: MarketKind::Spot,
            layout: Layout::Card,
            sort: SortStateOutput {
                key: None,
                direction: None,
            },
            columns: vec![],
            rows: vec![],
            cards: vec![],
        };
        assert!(output.is_empty());
    }

    #[test]
    fn test_sort_indicator_arrows() {
        assert_eq!(SortIndicator::Ascending.arrow(), "▲");
        assert_eq!(SortIndicator::Descending.arrow(), "▼");
        assert_eq!(SortIndicator::None.arrow(), "");
    }
}
