use crate::application::service::ArgosStringTranslation;
use crate::application::settings::{SettingsStore, OPTIONS_TITLE};
use crate::infrastructure::config::Config;
use crate::infrastructure::options::TomlOptions;
use crate::infrastructure::storage::SqliteDocument;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub document: Arc<SqliteDocument>,
    pub options: Arc<RwLock<TomlOptions>>,
    pub service: Arc<ArgosStringTranslation>,
}

impl AppState {
    /// Wire the options category, settings store and translation service.
    ///
    /// `config_path` is where option changes are persisted; `None` keeps
    /// them in memory.
    pub fn new(document: SqliteDocument, config: Config, config_path: Option<PathBuf>) -> Self {
        let timeout = Duration::from_secs(config.timeout_secs);
        let mut options = TomlOptions::new(OPTIONS_TITLE, config, config_path);
        let settings = SettingsStore::initialize(&mut options);

        Self {
            document: Arc::new(document),
            options: Arc::new(RwLock::new(options)),
            service: Arc::new(ArgosStringTranslation::new(settings, timeout)),
        }
    }
}
