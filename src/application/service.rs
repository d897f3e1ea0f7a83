use crate::application::settings::SettingsStore;
use crate::application::translate::translate_strings;
use crate::domain::model::{BatchReport, Location, TranslateOptions};
use crate::domain::traits::{CancelSignal, Document, StringTranslationService};
use crate::infrastructure::process::ArgosTranslator;
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::Arc;
use std::time::Duration;

pub const SERVICE_NAME: &str = "Argos String Translation";

/// Offline string translation through Argos Translate
pub struct ArgosStringTranslation {
    settings: Arc<SettingsStore>,
    timeout: Duration,
}

impl ArgosStringTranslation {
    pub fn new(settings: Arc<SettingsStore>, timeout: Duration) -> Self {
        Self { settings, timeout }
    }

    pub fn settings(&self) -> &Arc<SettingsStore> {
        &self.settings
    }
}

#[async_trait]
impl StringTranslationService for ArgosStringTranslation {
    fn service_name(&self) -> &str {
        SERVICE_NAME
    }

    async fn translate(
        &self,
        document: &dyn Document,
        locations: &[Location],
        options: &TranslateOptions,
        progress: &ProgressBar,
        cancel: CancelSignal,
    ) -> BatchReport {
        // Languages come from the settings snapshot, not from `options`
        let settings = self.settings.snapshot();
        tracing::debug!(
            auto_translate = options.auto_translate,
            from = %settings.source_language,
            to = %settings.target_language,
            path = %settings.argos_path,
            "starting translation batch"
        );

        let translator = ArgosTranslator::from_settings(&settings, self.timeout);
        translate_strings(
            document,
            &translator,
            &settings.languages(),
            locations,
            progress,
            cancel,
        )
        .await
    }
}
