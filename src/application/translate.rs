use crate::domain::error::ArgosError;
use crate::domain::model::{
    BatchItem, BatchReport, BatchStatus, ItemOutcome, LanguagePair, Location,
    TranslationAnnotation,
};
use crate::domain::traits::{CancelSignal, Document, Translator};
use indicatif::ProgressBar;
use tracing::Instrument;
use uuid::Uuid;

pub const TRANSACTION_LABEL: &str = "Translate strings";

enum Step {
    Next(BatchItem),
    Stop(BatchItem, BatchStatus),
}

/// Translate the strings at `locations` and annotate them, in order.
///
/// The whole batch runs inside one document transaction that is always
/// committed, so whatever was applied before a failure or cancellation
/// is kept. The first failure stops the batch; later items are reported
/// as [`ItemOutcome::NotAttempted`].
pub async fn translate_strings(
    document: &dyn Document,
    translator: &dyn Translator,
    languages: &LanguagePair,
    locations: &[Location],
    progress: &ProgressBar,
    cancel: CancelSignal,
) -> BatchReport {
    let batch_id = Uuid::new_v4();
    let span = tracing::info_span!("batch", id = %batch_id, items = locations.len());
    run_batch(
        batch_id, document, translator, languages, locations, progress, cancel,
    )
    .instrument(span)
    .await
}

async fn run_batch(
    batch_id: Uuid,
    document: &dyn Document,
    translator: &dyn Translator,
    languages: &LanguagePair,
    locations: &[Location],
    progress: &ProgressBar,
    mut cancel: CancelSignal,
) -> BatchReport {
    let mut report = BatchReport {
        batch_id: batch_id.to_string(),
        translator: translator.name().to_string(),
        label: TRANSACTION_LABEL.to_string(),
        languages: languages.clone(),
        items: Vec::with_capacity(locations.len()),
        status: BatchStatus::Complete,
        committed: false,
    };
    progress.set_length(locations.len() as u64);

    let transaction = match document.start_transaction(TRANSACTION_LABEL).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Error during translation");
            report.status = BatchStatus::Aborted {
                index: 0,
                reason: e.to_string(),
            };
            report.items = locations.iter().map(not_attempted).collect();
            return report;
        }
    };

    let mut stopped = None;
    for (index, location) in locations.iter().enumerate() {
        if *cancel.borrow() {
            stopped = Some(BatchStatus::Cancelled { index });
            break;
        }
        progress.set_message(location.to_string());

        match run_item(document, translator, languages, index, location, &mut cancel).await {
            Step::Next(item) => report.items.push(item),
            Step::Stop(item, status) => {
                report.items.push(item);
                stopped = Some(status);
                break;
            }
        }
        progress.inc(1);
    }

    let done = report.items.len();
    report
        .items
        .extend(locations[done..].iter().map(not_attempted));

    let untranslated = report.count(|o| matches!(o, ItemOutcome::Untranslated));
    report.status = match stopped {
        Some(status) => status,
        None if untranslated > 0 => BatchStatus::Partial,
        None => BatchStatus::Complete,
    };

    report.committed = match document.end_transaction(transaction, true).await {
        Ok(()) => true,
        Err(e) => {
            tracing::error!(error = %e, "Failed to commit translations");
            false
        }
    };
    report
}

async fn run_item(
    document: &dyn Document,
    translator: &dyn Translator,
    languages: &LanguagePair,
    index: usize,
    location: &Location,
    cancel: &mut CancelSignal,
) -> Step {
    let original = match document.string_at(location).await {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => return abort(index, location, None, e),
    };
    let Some(text) = original.clone() else {
        return Step::Next(BatchItem {
            location: location.clone(),
            original: None,
            outcome: ItemOutcome::Skipped,
        });
    };

    let translated = tokio::select! {
        result = translator.translate(&text, languages) => result,
        _ = cancellation(cancel) => {
            tracing::warn!(%location, "translation cancelled");
            return Step::Stop(
                BatchItem {
                    location: location.clone(),
                    original,
                    outcome: ItemOutcome::NotAttempted,
                },
                BatchStatus::Cancelled { index },
            );
        }
    };

    let translated = match translated {
        Ok(value) => value,
        Err(e) => return abort(index, location, original, e),
    };
    tracing::info!(
        "Original:{}, Translated:{}",
        text,
        translated.as_deref().unwrap_or("null")
    );

    let outcome = match translated.filter(|t| !t.is_empty()) {
        Some(value) => {
            let annotation = TranslationAnnotation::shown(value.clone());
            if let Err(e) = document.set_translation(location, annotation).await {
                return abort(index, location, original, e);
            }
            ItemOutcome::Translated(value)
        }
        None => ItemOutcome::Untranslated,
    };

    Step::Next(BatchItem {
        location: location.clone(),
        original,
        outcome,
    })
}

fn abort(index: usize, location: &Location, original: Option<String>, e: ArgosError) -> Step {
    tracing::error!(%location, error = %e, "Error during translation");
    let reason = e.to_string();
    Step::Stop(
        BatchItem {
            location: location.clone(),
            original,
            outcome: ItemOutcome::Failed(reason.clone()),
        },
        BatchStatus::Aborted { index, reason },
    )
}

fn not_attempted(location: &Location) -> BatchItem {
    BatchItem {
        location: location.clone(),
        original: None,
        outcome: ItemOutcome::NotAttempted,
    }
}

/// Resolves once cancellation is requested; never if the sender is gone.
async fn cancellation(cancel: &mut CancelSignal) {
    if cancel.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
