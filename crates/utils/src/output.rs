//! Unified output rendering: JSON or human-readable table.
//!
//! Usage:
//! ```ignore
//! use marketview_utils::output::{OutputFormat, render};
//!
//! let view: MarketsOutput = overview.render(...);
//! render(format, &view)?;
//! ```

use std::fmt::Write as _;

use anyhow::Result;
use serde::Serialize;

use marketview_common::types::MarketKind;
use marketview_types::config::Layout;
use marketview_types::output::*;

/// Output format for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table (default).
    Table,
    /// Compact JSON (for piping to jq, scripts).
    Json,
    /// Pretty-printed JSON (for reading).
    JsonPretty,
}

/// Trait for types that can render as a human-readable table.
///
/// `table_string` builds the text; `print_table` writes it to stdout.
pub trait TableDisplay {
    fn table_string(&self) -> String;

    fn print_table(&self) {
        print!("{}", self.table_string());
    }
}

/// Render structured output as JSON or a table, depending on format.
pub fn render<T: Serialize + TableDisplay>(format: OutputFormat, data: &T) -> Result<()> {
    match format {
        OutputFormat::Table => {
            data.print_table();
            Ok(())
        }
        OutputFormat::Json => {
            let json = serde_json::to_string(data)?;
            println!("{json}");
            Ok(())
        }
        OutputFormat::JsonPretty => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
            Ok(())
        }
    }
}

/// Render just the JSON formats (for types that handle their own table display).
/// Returns true if JSON was rendered, false if table mode was requested.
pub fn render_json_or<T: Serialize>(format: OutputFormat, data: &T) -> Result<bool> {
    match format {
        OutputFormat::Table => Ok(false),
        OutputFormat::Json => {
            let json = serde_json::to_string(data)?;
            println!("{json}");
            Ok(true)
        }
        OutputFormat::JsonPretty => {
            let json = serde_json::to_string_pretty(data)?;
            println!("{json}");
            Ok(true)
        }
    }
}

// ─── TableDisplay implementations for output types ──────────────────

fn header_label(col: &ColumnHeader) -> String {
    let arrow = col.indicator.arrow();
    if arrow.is_empty() {
        col.label.to_uppercase()
    } else {
        format!("{} {arrow}", col.label.to_uppercase())
    }
}

fn sort_caption(sort: &SortStateOutput) -> String {
    match (&sort.key, &sort.direction) {
        (Some(key), Some(dir)) => format!("sorted by {key} ({dir})"),
        _ => "default order (24h volume)".to_string(),
    }
}

fn table_layout(view: &MarketsOutput, out: &mut String) {
    let label = |key: &str| {
        view.columns
            .iter()
            .find(|c| c.key == key)
            .map(header_label)
            .unwrap_or_default()
    };
    let perp = view.kind == MarketKind::Perp;

    let _ = write!(
        out,
        "{:<16} {:>14}  {:<24} {:>12} {:>16}",
        label("name"),
        label("last"),
        "CHART",
        label("change24h"),
        label("volumeUsd24h"),
    );
    if perp {
        let _ = write!(out, "  {:<28} {:>16}", label("funding1h"), label("openInterestUsd"));
    }
    out.push('\n');
    let width = if perp { 150 } else { 88 };
    let _ = writeln!(out, "{}", "─".repeat(width));

    for r in &view.rows {
        let _ = write!(
            out,
            "{:<16} {:>14}  {:<24} {:>12} {:>16}",
            r.name, r.price.text, r.sparkline.text, r.change_24h.text, r.volume_24h.text,
        );
        if let Some(funding) = &r.funding {
            let oi = match &r.open_interest {
                Some(cell) => match &cell.quantity {
                    Some(q) => format!("{} ({q})", cell.usd.text),
                    None => cell.usd.text.clone(),
                },
                None => String::new(),
            };
            let _ = write!(out, "  {:<28} {:>16}", funding.text, oi);
        }
        out.push('\n');
    }
}

fn card_layout(view: &MarketsOutput, out: &mut String) {
    for c in &view.cards {
        let _ = writeln!(out, "┌ {:<16} {:>12}   {:>16}", c.name, c.change_24h.text, c.price.text);
        let apr = c
            .funding_apr
            .as_ref()
            .map(|f| f.text.as_str())
            .unwrap_or("");
        let _ = writeln!(out, "│ {:<30}   {:>16}", c.sparkline.text, apr);
        let _ = writeln!(out, "└ {}", c.href);
    }
}

impl TableDisplay for MarketsOutput {
    fn table_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "{} markets — {}\n",
            self.kind.to_string().to_uppercase(),
            sort_caption(&self.sort)
        );

        if self.is_empty() {
            out.push_str("No markets.\n");
            return out;
        }

        match self.layout {
            Layout::Table => table_layout(self, &mut out),
            Layout::Card => card_layout(self, &mut out),
        }
        let _ = writeln!(out, "\nTotal: {} markets", self.len());
        out
    }
}

impl TableDisplay for SortKeysOutput {
    fn table_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Sort keys ({} markets)\n", self.kind);
        let _ = writeln!(out, "{:<18} {}", "KEY", "COLUMN");
        let _ = writeln!(out, "{}", "─".repeat(36));
        for k in &self.keys {
            let _ = writeln!(out, "{:<18} {}", k.key, k.label);
        }
        out
    }
}
