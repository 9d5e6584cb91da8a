use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use marketview_types::config::AppConfig;
use tracing::info;

/// Dotfolder name under `$HOME`.
const DOTFOLDER: &str = ".marketview";

const CONFIG_FILE: &str = "config.toml";

/// Resolve the root path: `$HOME/.marketview/`.
pub fn root_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(DOTFOLDER))
}

/// Ensure `$HOME/.marketview/config.toml` exists. Idempotent.
pub fn init_workspace() -> Result<()> {
    init_workspace_at(&root_dir()?)
}

/// Ensure `root/config.toml` exists, seeding it with defaults.
pub fn init_workspace_at(root: &Path) -> Result<()> {
    if !root.exists() {
        fs::create_dir_all(root)
            .with_context(|| format!("Failed to create directory: {}", root.display()))?;
        info!("created directory: {}", root.display());
    }

    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        save_config_at(root, &AppConfig::default())?;
        info!("created default config: {}", config_path.display());
    }
    Ok(())
}

/// Load the config from `$HOME/.marketview/config.toml`.
pub fn load_config() -> Result<AppConfig> {
    load_config_at(&root_dir()?)
}

/// Load `root/config.toml`. If the schema is outdated, regenerate it with
/// defaults while preserving `general.verbose`.
pub fn load_config_at(root: &Path) -> Result<AppConfig> {
    let config_path = root.join(CONFIG_FILE);
    let raw = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;

    match AppConfig::from_toml_str(&raw) {
        Ok(config) => Ok(config),
        Err(e) => {
            info!("config.toml outdated ({e}), migrating to new schema");
            let mut new_config = AppConfig::default();

            if let Ok(old) = raw.parse::<toml::Table>() {
                if let Some(verbose) = old
                    .get("general")
                    .and_then(|v| v.as_table())
                    .and_then(|g| g.get("verbose"))
                    .and_then(|v| v.as_bool())
                {
                    new_config.general.verbose = verbose;
                }
            }

            save_config_at(root, &new_config)?;
            info!("config migrated successfully");
            Ok(new_config)
        }
    }
}

/// Write the config back to `$HOME/.marketview/config.toml`.
pub fn save_config(config: &AppConfig) -> Result<()> {
    save_config_at(&root_dir()?, config)
}

pub fn save_config_at(root: &Path, config: &AppConfig) -> Result<()> {
    let config_path = root.join(CONFIG_FILE);
    let toml_str = config
        .to_toml_string()
        .context("Failed to serialize config")?;
    fs::write(&config_path, &toml_str)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use marketview_types::config::Layout;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "marketview-ws-{name}-{}",
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn test_root_dir_under_home() {
        let root = root_dir().unwrap();
        let home = dirs::home_dir().unwrap();
        assert_eq!(root, home.join(".marketview"));
    }

    #[test]
    fn test_init_workspace_idempotent() {
        let root = scratch("init");
        init_workspace_at(&root).unwrap();
        init_workspace_at(&root).unwrap();
        assert!(root.join("config.toml").is_file());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_load_and_save_config() {
        let root = scratch("roundtrip");
        init_workspace_at(&root).unwrap();
        let mut config = load_config_at(&root).unwrap();
        config.display.layout = Layout::Card;
        save_config_at(&root, &config).unwrap();

        let reloaded = load_config_at(&root).unwrap();
        assert_eq!(reloaded.display.layout, Layout::Card);
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_outdated_config_is_migrated() {
        let root = scratch("migrate");
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("config.toml"), "[general]\nverbose = true\n").unwrap();

        let config = load_config_at(&root).unwrap();
        assert!(config.general.verbose);
        assert_eq!(config.display.sparkline_width, 24);

        // The migrated file now parses cleanly.
        let raw = fs::read_to_string(root.join("config.toml")).unwrap();
        assert!(AppConfig::from_toml_str(&raw).is_ok());
        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let root = scratch("missing");
        assert!(load_config_at(&root).is_err());
    }
}
