use anyhow::{bail, Result};
use marketview_common::types::MarketKind;
use marketview_core::workspace::{load_config, save_config};
use marketview_types::config::{AppConfig, Layout};
use marketview_utils::output::{render_json_or, OutputFormat};

/// `marketview configure show`: display current config.
pub fn show(config: &AppConfig, fmt: OutputFormat) -> Result<()> {
    if render_json_or(fmt, config)? {
        return Ok(());
    }

    println!("verbose          : {}", config.general.verbose);
    println!("default kind     : {}", config.display.default_kind);
    println!("layout           : {}", config.display.layout);
    println!("sparkline width  : {}", config.display.sparkline_width);
    println!("\nOpen-interest precision (fraction digits):");
    let mut contracts: Vec<_> = config.precision.contracts.iter().collect();
    contracts.sort_by(|a, b| a.0.cmp(b.0));
    for (symbol, digits) in contracts {
        println!("  {symbol:<8} {digits}");
    }
    println!();
    println!("Tip: Edit settings with `marketview configure <layout|kind|precision|verbose>`.");
    Ok(())
}

/// `marketview configure layout <table|card>`
pub fn set_layout(value: &str) -> Result<()> {
    let mut config = load_config()?;
    config.display.layout = parse_layout(value)?;
    save_config(&config)?;
    println!("✓ layout = {}", config.display.layout);
    Ok(())
}

/// `marketview configure kind <perp|spot>`
pub fn set_kind(value: &str) -> Result<()> {
    let mut config = load_config()?;
    config.display.default_kind = value.parse::<MarketKind>()?;
    save_config(&config)?;
    println!("✓ default kind = {}", config.display.default_kind);
    Ok(())
}

/// `marketview configure precision <SYMBOL> <DIGITS>`
pub fn set_precision(symbol: &str, digits: u32) -> Result<()> {
    if digits > 18 {
        bail!("Precision must be between 0 and 18 digits, got {digits}");
    }
    let mut config = load_config()?;
    let symbol = symbol.to_uppercase();
    config.precision.contracts.insert(symbol.clone(), digits);
    save_config(&config)?;
    println!("✓ {symbol} open interest shown with up to {digits} fraction digits");
    Ok(())
}

/// `marketview configure verbose <true|false>`
pub fn set_verbose(enabled: bool) -> Result<()> {
    let mut config = load_config()?;
    config.general.verbose = enabled;
    save_config(&config)?;
    println!("✓ verbose = {enabled}");
    Ok(())
}

/// `marketview configure sparkline-width <N>`
pub fn set_sparkline_width(width: usize) -> Result<()> {
    if width == 0 {
        bail!("Sparkline width must be at least 1");
    }
    let mut config = load_config()?;
    config.display.sparkline_width = width;
    save_config(&config)?;
    println!("✓ sparkline width = {width}");
    Ok(())
}

fn parse_layout(s: &str) -> Result<Layout> {
    match s.to_lowercase().as_str() {
        "table" | "row" | "rows" => Ok(Layout::Table),
        "card" | "cards" => Ok(Layout::Card),
        _ => bail!("Invalid layout '{s}'. Use: table or card"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_layout() {
        assert_eq!(parse_layout("TABLE").unwrap(), Layout::Table);
        assert_eq!(parse_layout("cards").unwrap(), Layout::Card);
        assert!(parse_layout("grid").is_err());
    }

    #[test]
    fn test_show_json() {
        show(&AppConfig::default(), OutputFormat::Json).unwrap();
    }
}
