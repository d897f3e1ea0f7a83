use crate::domain::error::ArgosError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "argos-strings";
const CONFIG_FILE: &str = "config.toml";
const DATABASE_FILE: &str = "strings.db";

/// Option values grouped by category, e.g. `[options."Argos Translation"]`
pub type OptionCategories = BTreeMap<String, BTreeMap<String, String>>;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    pub database: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub options: OptionCategories,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    #[serde(default = "default_enable")]
    pub enable: bool,
    pub path: Option<String>,
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            enable: true,
            path: None,
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: None,
            timeout_secs: default_timeout_secs(),
            logging: Logging::default(),
            options: OptionCategories::new(),
        }
    }
}

// Defaults
fn default_timeout_secs() -> u64 {
    120
}
fn default_enable() -> bool {
    true
}
fn default_log_level() -> String {
    "INFO".to_string()
}

pub fn get_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_DIR).join(CONFIG_FILE))
}

/// Database path: explicit `database` setting, else ~/.config/argos-strings/strings.db
pub fn get_database_path(config: &Config) -> PathBuf {
    if let Some(path) = config.database.as_deref().filter(|p| !p.is_empty()) {
        return PathBuf::from(path);
    }
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join(DATABASE_FILE)
}

pub fn load_config() -> Result<Config, ArgosError> {
    match get_config_path() {
        Some(path) if path.exists() => load_config_from(&path),
        _ => Ok(Config::default()),
    }
}

/// Load a config file; unparsable content falls back to defaults with a warning.
pub fn load_config_from(path: &Path) -> Result<Config, ArgosError> {
    let content = fs::read_to_string(path)?;
    match toml::from_str::<Config>(&content) {
        Ok(config) => Ok(config),
        Err(e) => {
            eprintln!(
                "Warning: Failed to parse config file: {}. Using defaults.",
                e
            );
            Ok(Config::default())
        }
    }
}

pub fn save_config_to(config: &Config, path: &Path) -> Result<(), ArgosError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let toml_content = toml::to_string_pretty(config)
        .map_err(|e| ArgosError::Config(format!("Failed to serialize config: {}", e)))?;
    fs::write(path, toml_content)
        .map_err(|e| ArgosError::Config(format!("Failed to write config file: {}", e)))?;
    Ok(())
}

/// Write `sample` to the default config path unless a file already exists.
pub fn generate_config_sample(sample: &Config) -> Result<(), ArgosError> {
    let Some(path) = get_config_path() else {
        return Err(ArgosError::Config(
            "Cannot determine config directory".to_string(),
        ));
    };

    if path.exists() {
        eprintln!("Config file already exists at: {}", path.display());
        return Ok(());
    }

    save_config_to(sample, &path)?;
    println!("Generated config file at: {}", path.display());
    Ok(())
}
