//! Map derived rows into table rows or cards.
//!
//! Both layouts read the same `EnrichedMarketRow`; only the set of cells
//! differs. Absence is taken from the row, never recomputed here.

use marketview_common::constants::UNAVAILABLE;
use marketview_common::types::MarketKind;
use marketview_types::config::Layout;
use marketview_types::output::{
    CardOutput, ColumnHeader, DisplayField, MarketsOutput, OpenInterestCell, SortIndicator,
    SortKeyRow, SortKeysOutput, SortStateOutput, TableRowOutput,
};
use marketview_utils::format::{
    display_field, format_funding_rate, format_pct, format_unit_price, format_usd_aggregate,
    sparkline, tone_of,
};

use crate::derive::EnrichedMarketRow;
use crate::overview::MarketOverview;
use crate::sort_key::SortKey;
use crate::sortable::{SortDirection, SortState};

fn indicator(state: &SortState<SortKey>, key: SortKey) -> SortIndicator {
    match state.direction_for(key) {
        Some(SortDirection::Ascending) => SortIndicator::Ascending,
        Some(SortDirection::Descending) => SortIndicator::Descending,
        None => SortIndicator::None,
    }
}

/// Column headers for a view, with the active sort marked.
pub fn columns(kind: MarketKind, state: &SortState<SortKey>) -> Vec<ColumnHeader> {
    SortKey::for_kind(kind)
        .iter()
        .map(|&key| ColumnHeader {
            key: key.as_str().to_string(),
            label: key.label().to_string(),
            indicator: indicator(state, key),
        })
        .collect()
}

pub fn sort_state_output(state: &SortState<SortKey>) -> SortStateOutput {
    SortStateOutput {
        key: state.active_key().map(|k| k.as_str().to_string()),
        direction: state.direction().map(|d| d.to_string()),
    }
}

fn sparkline_field(row: &EnrichedMarketRow, width: usize) -> DisplayField {
    match &row.price_series {
        Some(points) => DisplayField::present(sparkline(points, width)),
        None => DisplayField::unavailable(UNAVAILABLE),
    }
}

fn funding_field(row: &EnrichedMarketRow) -> DisplayField {
    display_field(row.market.funding1h, |rate| {
        format!("{} ({} APR)", format_funding_rate(rate), row.funding_apr)
    })
}

fn apr_field(row: &EnrichedMarketRow) -> DisplayField {
    if row.availability.funding {
        DisplayField::present(format!("{} APR", row.funding_apr))
    } else {
        DisplayField::unavailable(UNAVAILABLE)
    }
}

fn open_interest_cell(row: &EnrichedMarketRow) -> OpenInterestCell {
    let usd = display_field(row.market.open_interest_usd, format_usd_aggregate);
    // Quantity is shown under the USD value only.
    let quantity = if usd.available {
        row.open_interest_display
            .as_ref()
            .map(|q| format!("{q} {}", row.base_symbol()))
    } else {
        None
    };
    OpenInterestCell { usd, quantity }
}

/// Desktop table row.
pub fn table_row(row: &EnrichedMarketRow, kind: MarketKind, sparkline_width: usize) -> TableRowOutput {
    let is_perp = kind == MarketKind::Perp;
    TableRowOutput {
        name: row.name().to_string(),
        href: row.href(),
        icon: row.icon_key(),
        price: display_field(row.market.last, format_unit_price),
        sparkline: sparkline_field(row, sparkline_width),
        change_24h: display_field(row.market.change24h, format_pct),
        change_tone: tone_of(row.market.change24h),
        volume_24h: display_field(row.market.volume_usd24h, format_usd_aggregate),
        funding: is_perp.then(|| funding_field(row)),
        open_interest: is_perp.then(|| open_interest_cell(row)),
    }
}

/// Mobile card.
pub fn card(row: &EnrichedMarketRow, kind: MarketKind, sparkline_width: usize) -> CardOutput {
    CardOutput {
        name: row.name().to_string(),
        href: row.href(),
        icon: row.icon_key(),
        price: display_field(row.market.last, format_unit_price),
        change_24h: display_field(row.market.change24h, format_pct),
        change_tone: tone_of(row.market.change24h),
        sparkline: sparkline_field(row, sparkline_width),
        funding_apr: (kind == MarketKind::Perp).then(|| apr_field(row)),
    }
}

/// Render the whole view in `layout`.
pub fn render(overview: &MarketOverview, layout: Layout, sparkline_width: usize) -> MarketsOutput {
    let kind = overview.kind();
    let state = overview.sort_state();
    let (rows, cards) = match layout {
        Layout::Table => (
            overview
                .items()
                .map(|r| table_row(r, kind, sparkline_width))
                .collect(),
            Vec::new(),
        ),
        Layout::Card => (
            Vec::new(),
            overview
                .items()
                .map(|r| card(r, kind, sparkline_width))
                .collect(),
        ),
    };

    MarketsOutput {
        kind,
        layout,
        sort: sort_state_output(&state),
        columns: columns(kind, &state),
        rows,
        cards,
    }
}

/// Sortable keys for a market kind.
pub fn sort_keys(kind: MarketKind) -> SortKeysOutput {
    SortKeysOutput {
        kind,
        keys: SortKey::for_kind(kind)
            .iter()
            .map(|k| SortKeyRow {
                key: k.as_str().to_string(),
                label: k.label().to_string(),
            })
            .collect(),
    }
}
