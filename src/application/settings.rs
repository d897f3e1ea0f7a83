use crate::domain::model::{
    TranslationSettings, DEFAULT_ARGOS_PATH, DEFAULT_SOURCE_LANGUAGE, DEFAULT_TARGET_LANGUAGE,
};
use crate::domain::traits::{OptionsBackend, OptionsChangeListener};
use std::sync::{Arc, PoisonError, RwLock};

pub const OPTIONS_TITLE: &str = "Argos Translation";
pub const SOURCE_LANG_OPTION: &str = "Source Language";
pub const TARGET_LANG_OPTION: &str = "Target Language";
pub const ARGOS_PATH_OPTION: &str = "Argos Path";

/// Process-wide translation settings.
///
/// Readers take an `Arc` snapshot; every change builds a new snapshot and
/// swaps it in, so a running batch never sees a half-applied update.
#[derive(Default)]
pub struct SettingsStore {
    current: RwLock<Arc<TranslationSettings>>,
}

impl SettingsStore {
    pub fn new(settings: TranslationSettings) -> Self {
        Self {
            current: RwLock::new(Arc::new(settings)),
        }
    }

    /// Register the options with their defaults, load the current values
    /// and subscribe to later changes.
    pub fn initialize(backend: &mut dyn OptionsBackend) -> Arc<Self> {
        backend.register_option(
            SOURCE_LANG_OPTION,
            DEFAULT_SOURCE_LANGUAGE,
            "Source language (e.g. ko for Korean)",
        );
        backend.register_option(
            TARGET_LANG_OPTION,
            DEFAULT_TARGET_LANGUAGE,
            "Target language (e.g. en for English)",
        );
        backend.register_option(
            ARGOS_PATH_OPTION,
            DEFAULT_ARGOS_PATH,
            "Path to the Argos Translate executable",
        );

        let store = Arc::new(Self::new(TranslationSettings {
            source_language: backend.get_string(SOURCE_LANG_OPTION, DEFAULT_SOURCE_LANGUAGE),
            target_language: backend.get_string(TARGET_LANG_OPTION, DEFAULT_TARGET_LANGUAGE),
            argos_path: backend.get_string(ARGOS_PATH_OPTION, DEFAULT_ARGOS_PATH),
        }));
        backend.add_change_listener(store.clone());
        store
    }

    pub fn snapshot(&self) -> Arc<TranslationSettings> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Update the field named `name`; other names are ignored.
    pub fn on_option_changed(&self, name: &str, new_value: &str) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = TranslationSettings::clone(&current);
        match name {
            SOURCE_LANG_OPTION => next.source_language = new_value.to_string(),
            TARGET_LANG_OPTION => next.target_language = new_value.to_string(),
            ARGOS_PATH_OPTION => next.argos_path = new_value.to_string(),
            _ => return,
        }
        *current = Arc::new(next);
    }
}

impl OptionsChangeListener for SettingsStore {
    fn options_changed(&self, name: &str, _old_value: Option<&str>, new_value: &str) {
        self.on_option_changed(name, new_value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::Config;
    use crate::infrastructure::options::TomlOptions;

    #[test]
    fn initialize_registers_defaults() {
        let mut options = TomlOptions::new(OPTIONS_TITLE, Config::default(), None);
        let store = SettingsStore::initialize(&mut options);

        assert_eq!(*store.snapshot(), TranslationSettings::default());
        let names: Vec<String> = options.entries().into_iter().map(|e| e.name).collect();
        assert_eq!(
            names,
            vec![ARGOS_PATH_OPTION, SOURCE_LANG_OPTION, TARGET_LANG_OPTION]
        );
    }

    #[test]
    fn initialize_keeps_persisted_values() {
        let mut config = Config::default();
        config
            .options
            .entry(OPTIONS_TITLE.to_string())
            .or_default()
            .insert(SOURCE_LANG_OPTION.to_string(), "ja".to_string());
        let mut options = TomlOptions::new(OPTIONS_TITLE, config, None);

        let store = SettingsStore::initialize(&mut options);
        assert_eq!(store.snapshot().source_language, "ja");
        assert_eq!(store.snapshot().target_language, "en");
    }

    #[test]
    fn change_notification_swaps_snapshot() {
        let mut options = TomlOptions::new(OPTIONS_TITLE, Config::default(), None);
        let store = SettingsStore::initialize(&mut options);
        let before = store.snapshot();

        options.set_string(TARGET_LANG_OPTION, "fr").unwrap();

        assert_eq!(before.target_language, "en");
        assert_eq!(store.snapshot().target_language, "fr");
    }

    #[test]
    fn unknown_option_name_is_ignored() {
        let store = SettingsStore::default();
        store.on_option_changed("Theme", "dark");
        assert_eq!(*store.snapshot(), TranslationSettings::default());
    }
}
