//! Batch translation tests against in-memory documents

use argos_strings::application::translate::{translate_strings, TRANSACTION_LABEL};
use argos_strings::domain::error::ArgosError;
use argos_strings::domain::model::{
    BatchStatus, ItemOutcome, LanguagePair, Location, TranslationAnnotation,
};
use argos_strings::domain::traits::{Document, Translator};
use argos_strings::infrastructure::storage::{MemoryDocument, SqliteDocument};
use async_trait::async_trait;
use indicatif::ProgressBar;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;

/// Translator answering from a fixed table and recording every call
#[derive(Default)]
struct TableTranslator {
    answers: HashMap<String, Option<String>>,
    failing: Vec<String>,
    calls: Mutex<Vec<String>>,
    events: Mutex<Vec<String>>,
    delay: Option<Duration>,
}

impl TableTranslator {
    fn with(pairs: &[(&str, Option<&str>)]) -> Self {
        Self {
            answers: pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.map(str::to_string)))
                .collect(),
            ..Default::default()
        }
    }

    fn failing_on(mut self, text: &str) -> Self {
        self.failing.push(text.to_string());
        self
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for TableTranslator {
    fn name(&self) -> &str {
        "table"
    }

    async fn translate(
        &self,
        text: &str,
        _languages: &LanguagePair,
    ) -> Result<Option<String>, ArgosError> {
        self.calls.lock().unwrap().push(text.to_string());
        self.events.lock().unwrap().push(format!("start {}", text));
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.events.lock().unwrap().push(format!("end {}", text));

        if self.failing.iter().any(|f| f == text) {
            return Err(ArgosError::Io(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "translator crashed",
            )));
        }
        Ok(self.answers.get(text).cloned().flatten())
    }
}

/// Translator that never answers
struct HungTranslator;

#[async_trait]
impl Translator for HungTranslator {
    fn name(&self) -> &str {
        "hung"
    }

    async fn translate(
        &self,
        _text: &str,
        _languages: &LanguagePair,
    ) -> Result<Option<String>, ArgosError> {
        std::future::pending().await
    }
}

fn ko_en() -> LanguagePair {
    LanguagePair {
        from: "ko".to_string(),
        to: "en".to_string(),
    }
}

fn locations(addresses: &[&str]) -> Vec<Location> {
    addresses.iter().map(|a| Location::from(*a)).collect()
}

fn no_cancel() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    // a dropped sender must never count as cancellation
    drop(tx);
    rx
}

#[tokio::test]
async fn translates_and_marks_for_display() {
    let doc = MemoryDocument::new();
    doc.insert("0x1000", Some("안녕하세요"));
    let translator = TableTranslator::with(&[("안녕하세요", Some("Hello"))]);

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x1000"]),
        &ProgressBar::hidden(),
        no_cancel(),
    )
    .await;

    assert_eq!(
        doc.annotation(&Location::from("0x1000")),
        Some(TranslationAnnotation {
            translated_value: "Hello".to_string(),
            show_translated: true,
        })
    );
    assert_eq!(report.status, BatchStatus::Complete);
    assert!(report.committed);
    assert_eq!(report.translated_count(), 1);
    assert_eq!(report.label, TRANSACTION_LABEL);

    let journal = doc.journal().await;
    assert_eq!(journal.len(), 1);
    assert_eq!(journal[0].label, TRANSACTION_LABEL);
    assert!(journal[0].committed);
}

#[tokio::test]
async fn null_and_empty_values_are_skipped_without_invocation() {
    let doc = MemoryDocument::new();
    doc.insert("0x10", None);
    doc.insert("0x20", Some(""));
    let translator = TableTranslator::default();

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x10", "0x20", "0x30"]),
        &ProgressBar::hidden(),
        no_cancel(),
    )
    .await;

    assert!(translator.calls().is_empty());
    assert!(report
        .items
        .iter()
        .all(|item| item.outcome == ItemOutcome::Skipped));
    assert_eq!(report.status, BatchStatus::Complete);
    assert!(doc.annotation(&Location::from("0x10")).is_none());
    assert!(doc.annotation(&Location::from("0x20")).is_none());
}

#[tokio::test]
async fn empty_translation_leaves_annotation_unset() {
    let doc = MemoryDocument::new();
    doc.insert("0x10", Some("하나"));
    doc.insert("0x20", Some("둘"));
    let translator = TableTranslator::with(&[("하나", Some("")), ("둘", None)]);

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x10", "0x20"]),
        &ProgressBar::hidden(),
        no_cancel(),
    )
    .await;

    assert_eq!(translator.calls(), vec!["하나", "둘"]);
    assert!(doc.annotation(&Location::from("0x10")).is_none());
    assert!(doc.annotation(&Location::from("0x20")).is_none());
    assert_eq!(report.status, BatchStatus::Partial);
    assert!(report.committed);
}

#[tokio::test]
async fn items_are_translated_in_order_without_overlap() {
    let doc = MemoryDocument::new();
    doc.insert("0x30", Some("A"));
    doc.insert("0x10", Some("B"));
    doc.insert("0x20", Some("C"));
    let mut translator =
        TableTranslator::with(&[("A", Some("a")), ("B", Some("b")), ("C", Some("c"))]);
    translator.delay = Some(Duration::from_millis(10));

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x30", "0x10", "0x20"]),
        &ProgressBar::hidden(),
        no_cancel(),
    )
    .await;

    assert_eq!(translator.calls(), vec!["A", "B", "C"]);
    assert_eq!(
        *translator.events.lock().unwrap(),
        vec!["start A", "end A", "start B", "end B", "start C", "end C"]
    );
    let order: Vec<&str> = report.items.iter().map(|i| i.location.as_str()).collect();
    assert_eq!(order, vec!["0x30", "0x10", "0x20"]);
}

#[tokio::test]
async fn failure_stops_batch_and_commits_earlier_items() {
    let doc = MemoryDocument::new();
    doc.insert("0x10", Some("하나"));
    doc.insert("0x20", Some("둘"));
    doc.insert("0x30", Some("셋"));
    let translator =
        TableTranslator::with(&[("하나", Some("one")), ("셋", Some("three"))]).failing_on("둘");

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x10", "0x20", "0x30"]),
        &ProgressBar::hidden(),
        no_cancel(),
    )
    .await;

    assert_eq!(translator.calls(), vec!["하나", "둘"]);
    assert_eq!(
        doc.annotation(&Location::from("0x10")).unwrap().translated_value,
        "one"
    );
    assert!(doc.annotation(&Location::from("0x20")).is_none());
    assert!(doc.annotation(&Location::from("0x30")).is_none());

    assert!(matches!(report.status, BatchStatus::Aborted { index: 1, .. }));
    assert!(matches!(report.items[1].outcome, ItemOutcome::Failed(_)));
    assert_eq!(report.items[2].outcome, ItemOutcome::NotAttempted);
    assert!(report.committed);
    assert!(doc.journal().await[0].committed);
}

#[tokio::test]
async fn second_item_failure_keeps_first_in_sqlite_document() {
    let doc = SqliteDocument::open_in_memory().await.unwrap();
    doc.import_strings(vec![
        (Location::from("0x10"), "안녕하세요".to_string()),
        (Location::from("0x20"), "고마워".to_string()),
    ])
    .await
    .unwrap();
    let translator = TableTranslator::with(&[("안녕하세요", Some("Hello"))]).failing_on("고마워");

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x10", "0x20"]),
        &ProgressBar::hidden(),
        no_cancel(),
    )
    .await;

    assert!(report.committed);
    assert!(matches!(report.status, BatchStatus::Aborted { index: 1, .. }));
    let first = doc.annotation_at(&Location::from("0x10")).await.unwrap();
    assert_eq!(first.unwrap().translated_value, "Hello");
    assert!(doc
        .annotation_at(&Location::from("0x20"))
        .await
        .unwrap()
        .is_none());

    let journal = doc.recent_transactions(1).await.unwrap();
    assert!(journal[0].committed);
    assert!(journal[0].ended_at.is_some());
}

#[tokio::test]
async fn cancelled_before_start_attempts_nothing() {
    let doc = MemoryDocument::new();
    doc.insert("0x10", Some("하나"));
    let translator = TableTranslator::with(&[("하나", Some("one"))]);
    let (_tx, rx) = watch::channel(true);

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x10"]),
        &ProgressBar::hidden(),
        rx,
    )
    .await;

    assert!(translator.calls().is_empty());
    assert_eq!(report.status, BatchStatus::Cancelled { index: 0 });
    assert_eq!(report.items[0].outcome, ItemOutcome::NotAttempted);
    assert!(report.committed);
}

#[tokio::test]
async fn cancel_interrupts_hung_translator() {
    let doc = MemoryDocument::new();
    doc.insert("0x10", Some("하나"));
    doc.insert("0x20", Some("둘"));
    let (tx, rx) = watch::channel(false);

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        let _ = tx.send(true);
    });

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        translate_strings(
            &doc,
            &HungTranslator,
            &ko_en(),
            &locations(&["0x10", "0x20"]),
            &ProgressBar::hidden(),
            rx,
        ),
    )
    .await
    .expect("cancellation should end the batch");

    assert_eq!(report.status, BatchStatus::Cancelled { index: 0 });
    assert_eq!(report.items.len(), 2);
    assert_eq!(report.items[0].original.as_deref(), Some("하나"));
    assert!(report.committed);
    assert!(doc.journal().await[0].committed);
}

#[tokio::test]
async fn open_transaction_aborts_before_any_item() {
    let doc = MemoryDocument::new();
    doc.insert("0x10", Some("하나"));
    let busy = doc.start_transaction("other writer").await.unwrap();
    let translator = TableTranslator::with(&[("하나", Some("one"))]);

    let report = translate_strings(
        &doc,
        &translator,
        &ko_en(),
        &locations(&["0x10"]),
        &ProgressBar::hidden(),
        no_cancel(),
    )
    .await;

    assert!(translator.calls().is_empty());
    assert!(matches!(report.status, BatchStatus::Aborted { index: 0, .. }));
    assert!(!report.committed);
    doc.end_transaction(busy, true).await.unwrap();
}
