// Options category persisted inside the TOML config file
use crate::domain::error::ArgosError;
use crate::domain::traits::{OptionsBackend, OptionsChangeListener};
use crate::infrastructure::config::{save_config_to, Config};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionEntry {
    pub name: String,
    pub value: String,
    pub help: String,
}

/// One named options category, e.g. `[options."Argos Translation"]`.
///
/// Values live in the loaded [`Config`]; `set_string` writes the whole
/// config back to `path` (when there is one) and notifies listeners.
pub struct TomlOptions {
    category: String,
    config: Config,
    path: Option<PathBuf>,
    help: BTreeMap<String, String>,
    listeners: Vec<Arc<dyn OptionsChangeListener>>,
}

impl TomlOptions {
    pub fn new(category: impl Into<String>, config: Config, path: Option<PathBuf>) -> Self {
        Self {
            category: category.into(),
            config,
            path,
            help: BTreeMap::new(),
            listeners: Vec::new(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn values(&self) -> Option<&BTreeMap<String, String>> {
        self.config.options.get(&self.category)
    }

    /// Registered options with their current values, in name order
    pub fn entries(&self) -> Vec<OptionEntry> {
        self.help
            .iter()
            .map(|(name, help)| OptionEntry {
                name: name.clone(),
                value: self
                    .values()
                    .and_then(|values| values.get(name))
                    .cloned()
                    .unwrap_or_default(),
                help: help.clone(),
            })
            .collect()
    }

    /// Change a registered option, persist it and notify listeners.
    pub fn set_string(&mut self, name: &str, value: &str) -> Result<(), ArgosError> {
        if !self.help.contains_key(name) {
            return Err(ArgosError::Config(format!(
                "Unknown option '{}' in category '{}'",
                name, self.category
            )));
        }

        let old_value = self
            .config
            .options
            .entry(self.category.clone())
            .or_default()
            .insert(name.to_string(), value.to_string());

        if let Some(path) = &self.path {
            save_config_to(&self.config, path)?;
        }

        if old_value.as_deref() == Some(value) {
            return Ok(());
        }
        tracing::debug!(option = name, value, "option changed");
        for listener in &self.listeners {
            listener.options_changed(name, old_value.as_deref(), value);
        }
        Ok(())
    }
}

impl OptionsBackend for TomlOptions {
    fn register_option(&mut self, name: &str, default: &str, help: &str) {
        self.help.insert(name.to_string(), help.to_string());
        self.config
            .options
            .entry(self.category.clone())
            .or_default()
            .entry(name.to_string())
            .or_insert_with(|| default.to_string());
    }

    fn get_string(&self, name: &str, default: &str) -> String {
        self.values()
            .and_then(|values| values.get(name))
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }

    fn add_change_listener(&mut self, listener: Arc<dyn OptionsChangeListener>) {
        self.listeners.push(listener);
    }
}
