use crate::domain::error::ArgosError;
use crate::domain::model::{
    BatchReport, LanguagePair, Location, TranslateOptions, TranslationAnnotation,
};
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::sync::Arc;
use tokio::sync::watch;

pub type TransactionId = i64;

/// Cancellation signal for a running batch; `true` means cancel requested.
pub type CancelSignal = watch::Receiver<bool>;

/// Trait for translation backends
///
/// Implementations translate one text at a time. `Ok(None)` means the
/// backend answered but produced no translation.
#[async_trait]
pub trait Translator: Send + Sync {
    fn name(&self) -> &str;

    async fn translate(
        &self,
        text: &str,
        languages: &LanguagePair,
    ) -> Result<Option<String>, ArgosError>;
}

/// Trait for the program document holding string data units
///
/// Writes happen inside a transaction opened with `start_transaction`
/// and closed with `end_transaction`.
#[async_trait]
pub trait Document: Send + Sync {
    async fn start_transaction(&self, label: &str) -> Result<TransactionId, ArgosError>;

    async fn end_transaction(&self, id: TransactionId, commit: bool) -> Result<(), ArgosError>;

    /// Current string value at `location`, `None` if it does not resolve
    async fn string_at(&self, location: &Location) -> Result<Option<String>, ArgosError>;

    async fn annotation_at(
        &self,
        location: &Location,
    ) -> Result<Option<TranslationAnnotation>, ArgosError>;

    async fn set_translation(
        &self,
        location: &Location,
        annotation: TranslationAnnotation,
    ) -> Result<(), ArgosError>;

    /// All string-bearing locations, in address order
    async fn locations(&self) -> Result<Vec<Location>, ArgosError>;
}

/// Receives option change notifications
pub trait OptionsChangeListener: Send + Sync {
    fn options_changed(&self, name: &str, old_value: Option<&str>, new_value: &str);
}

/// Trait for a persisted, named options category
pub trait OptionsBackend {
    /// Register `name` with its default; an existing value is kept
    fn register_option(&mut self, name: &str, default: &str, help: &str);

    fn get_string(&self, name: &str, default: &str) -> String;

    fn add_change_listener(&mut self, listener: Arc<dyn OptionsChangeListener>);
}

/// A named string translation backend offered to the user
#[async_trait]
pub trait StringTranslationService: Send + Sync {
    fn service_name(&self) -> &str;

    async fn translate(
        &self,
        document: &dyn Document,
        locations: &[Location],
        options: &TranslateOptions,
        progress: &ProgressBar,
        cancel: CancelSignal,
    ) -> BatchReport;
}
