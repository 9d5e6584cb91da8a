//! Formatting utilities: fallback sentinel, USD, percentages, quantities,
//! sparklines.
//!
//! Presence means "the value is defined". Zero and negative numbers are
//! present values; only `None` falls back to the sentinel.

use marketview_common::constants::{
    AGGREGATE_USD_DECIMALS, FUNDING_1H_DECIMALS, PCT_DECIMALS, UNAVAILABLE, UNIT_PRICE_DECIMALS,
};
use marketview_common::types::PricePoint;
use marketview_types::output::{DisplayField, Tone};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Render `value` with `formatter`, or the sentinel when it is absent.
pub fn format_or_fallback<F>(value: Option<f64>, formatter: F) -> String
where
    F: FnOnce(f64) -> String,
{
    match value {
        Some(v) => formatter(v),
        None => UNAVAILABLE.to_string(),
    }
}

/// Same as [`format_or_fallback`] but keeps the presence flag.
pub fn display_field<F>(value: Option<f64>, formatter: F) -> DisplayField
where
    F: FnOnce(f64) -> String,
{
    match value {
        Some(v) => DisplayField::present(formatter(v)),
        None => DisplayField::unavailable(UNAVAILABLE),
    }
}

/// Insert `,` every three digits of an unsigned integer string.
pub fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Group the integer part of an already-rounded decimal string.
fn group_decimal_str(s: &str) -> String {
    let (sign, unsigned) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s),
    };
    match unsigned.split_once('.') {
        Some((int, frac)) => format!("{sign}{}.{frac}", group_thousands(int)),
        None => format!("{sign}{}", group_thousands(unsigned)),
    }
}

/// Turn `-0.0` into `0.0` so rounding never prints `-0.00`.
fn positive_zero(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else {
        v
    }
}

/// Format as USD with thousands separators: `$1,234.56`, `-$12.00`.
pub fn format_usd(value: f64, decimals: usize) -> String {
    let rounded = format!("{:.*}", decimals, positive_zero(value).abs());
    // Rounding can turn a tiny negative into zero.
    let is_negative = value < 0.0 && rounded.chars().any(|c| c.is_ascii_digit() && c != '0');
    let grouped = group_decimal_str(&rounded);
    if is_negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Unit price: 2 decimals (`$41,250.50`).
pub fn format_unit_price(value: f64) -> String {
    format_usd(value, UNIT_PRICE_DECIMALS)
}

/// Aggregate USD magnitude (volume, open interest): rounded, no decimals.
pub fn format_usd_aggregate(value: f64) -> String {
    format_usd(value, AGGREGATE_USD_DECIMALS)
}

/// Fractional ratio → percentage with 2 decimals (0.0525 → `5.25%`).
pub fn format_pct(ratio: f64) -> String {
    let pct = format!("{:.*}", PCT_DECIMALS, positive_zero(ratio * 100.0));
    if pct.trim_start_matches('-').chars().all(|c| c == '0' || c == '.') {
        format!("{}%", pct.trim_start_matches('-'))
    } else {
        format!("{pct}%")
    }
}

/// A value already expressed in percent (APR) with 2 decimals.
pub fn format_percent_value(pct: f64) -> String {
    format!("{:.*}%", PCT_DECIMALS, positive_zero(pct))
}

/// Raw hourly funding rate, 4 decimals (`0.0012%`).
pub fn format_funding_rate(rate: f64) -> String {
    format!("{:.*}%", FUNDING_1H_DECIMALS, positive_zero(rate))
}

/// Color for a signed value. Zero is positive; absent is muted.
pub fn tone_of(value: Option<f64>) -> Tone {
    match value {
        Some(v) if v >= 0.0 => Tone::Positive,
        Some(_) => Tone::Negative,
        None => Tone::Muted,
    }
}

/// Base-asset quantity with at most `max_fraction_digits` decimals,
/// trailing zeros trimmed and thousands grouped (`12,345.6789`).
///
/// `None` means the symbol has no precision entry: full precision.
pub fn format_quantity(value: f64, max_fraction_digits: Option<u32>) -> String {
    let Some(dp) = max_fraction_digits else {
        return group_decimal_str(&value.to_string());
    };
    let Some(dec) = Decimal::from_f64(value) else {
        return value.to_string();
    };
    let dec = dec
        .round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let s = if dec.is_zero() {
        "0".to_string()
    } else {
        dec.to_string()
    };
    group_decimal_str(&s)
}

const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render a price series as a block-character sparkline at most `width`
/// columns wide. Scaled to the series' own min/max, no axes.
///
/// An empty series renders as an empty string.
pub fn sparkline(points: &[PricePoint], width: usize) -> String {
    if points.is_empty() || width == 0 {
        return String::new();
    }

    // Downsample by taking the last price in each bucket.
    let columns = width.min(points.len());
    let samples: Vec<f64> = (0..columns)
        .map(|col| {
            let end = ((col + 1) * points.len()) / columns;
            points[end.saturating_sub(1)].price()
        })
        .collect();

    let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
    let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    samples
        .iter()
        .map(|p| {
            if span <= 0.0 || !span.is_finite() {
                SPARK_LEVELS[SPARK_LEVELS.len() / 2]
            } else {
                let level = (((p - min) / span) * top).round() as usize;
                SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_for_none() {
        assert_eq!(format_or_fallback(None, format_pct), "unavailable");
    }

    #[test]
    fn test_zero_change_is_present() {
        assert_eq!(format_or_fallback(Some(0.0), format_pct), "0.00%");
        let field = display_field(Some(0.0), format_pct);
        assert!(field.available);
    }

    #[test]
    fn test_negative_is_present() {
        assert_eq!(format_or_fallback(Some(-0.0325), format_pct), "-3.25%");
    }

    #[test]
    fn test_display_field_unavailable() {
        let field = display_field(None, format_unit_price);
        assert!(!field.available);
        assert_eq!(field.text, "unavailable");
    }

    #[test]
    fn test_format_pct_no_negative_zero() {
        assert_eq!(format_pct(-0.0), "0.00%");
        assert_eq!(format_pct(-0.000001), "0.00%");
        assert_eq!(format_pct(0.05), "5.00%");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("1"), "1");
        assert_eq!(group_thousands("123"), "123");
        assert_eq!(group_thousands("1234"), "1,234");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn test_unit_price_two_decimals() {
        assert_eq!(format_unit_price(41250.5), "$41,250.50");
        assert_eq!(format_unit_price(0.0), "$0.00");
        assert_eq!(format_unit_price(0.12345), "$0.12");
    }

    #[test]
    fn test_aggregate_usd_rounded() {
        assert_eq!(format_usd_aggregate(1234567.89), "$1,234,568");
        assert_eq!(format_usd_aggregate(999.4), "$999");
    }

    #[test]
    fn test_usd_negative() {
        assert_eq!(format_usd(-1234.5, 2), "-$1,234.50");
        assert_eq!(format_usd(-0.001, 2), "$0.00");
    }

    #[test]
    fn test_funding_rate_four_decimals() {
        assert_eq!(format_funding_rate(0.0012), "0.0012%");
        assert_eq!(format_funding_rate(-0.0005), "-0.0005%");
    }

    #[test]
    fn test_percent_value() {
        assert_eq!(format_percent_value(0.88), "0.88%");
        assert_eq!(format_percent_value(-0.0), "0.00%");
    }

    #[test]
    fn test_tone_zero_is_positive() {
        assert_eq!(tone_of(Some(0.0)), Tone::Positive);
        assert_eq!(tone_of(Some(-0.01)), Tone::Negative);
        assert_eq!(tone_of(None), Tone::Muted);
    }

    #[test]
    fn test_quantity_with_precision() {
        assert_eq!(format_quantity(12.345678, Some(4)), "12.3457");
        assert_eq!(format_quantity(12.5, Some(4)), "12.5");
        assert_eq!(format_quantity(1234567.4, Some(0)), "1,234,567");
    }

    #[test]
    fn test_quantity_full_precision_when_unmapped() {
        assert_eq!(format_quantity(0.123456, None), "0.123456");
        assert_eq!(format_quantity(2500.25, None), "2,500.25");
    }

    #[test]
    fn test_quantity_zero() {
        assert_eq!(format_quantity(0.0, Some(2)), "0");
    }

    #[test]
    fn test_sparkline_empty() {
        assert_eq!(sparkline(&[], 10), "");
    }

    #[test]
    fn test_sparkline_rising() {
        let points: Vec<PricePoint> = (0..8).map(|i| PricePoint(i, i as f64)).collect();
        assert_eq!(sparkline(&points, 8), "▁▂▃▄▅▆▇█");
    }

    #[test]
    fn test_sparkline_flat() {
        let points = vec![PricePoint(0, 5.0), PricePoint(1, 5.0), PricePoint(2, 5.0)];
        assert_eq!(sparkline(&points, 10), "▅▅▅");
    }

    #[test]
    fn test_sparkline_downsamples_to_width() {
        let points: Vec<PricePoint> = (0..100).map(|i| PricePoint(i, i as f64)).collect();
        let line = sparkline(&points, 10);
        assert_eq!(line.chars().count(), 10);
        assert!(line.starts_with('▁'));
        assert!(line.ends_with('█'));
    }
}
