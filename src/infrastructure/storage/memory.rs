// In-memory document implementation using DashMap
use crate::domain::error::ArgosError;
use crate::domain::model::{Location, TranslationAnnotation};
use crate::domain::traits::{Document, TransactionId};
use crate::infrastructure::storage::db::TransactionRecord;
use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
struct StringUnit {
    value: Option<String>,
    annotation: Option<TranslationAnnotation>,
}

struct OpenTransaction {
    id: TransactionId,
    // previous annotations, restored in reverse on rollback
    undo: Vec<(Location, Option<TranslationAnnotation>)>,
}

/// Thread-safe in-memory document
///
/// Used for `--dry-run` batches and in tests. Mirrors the transaction
/// rules of the SQLite document: one open transaction, writes only
/// inside it, rollback restores the previous annotations.
#[derive(Default)]
pub struct MemoryDocument {
    units: DashMap<Location, StringUnit>,
    open: Mutex<Option<OpenTransaction>>,
    journal: Mutex<Vec<TransactionRecord>>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string data unit; `None` models a unit without a string value.
    pub fn insert(&self, location: impl Into<Location>, value: Option<&str>) {
        self.units.insert(
            location.into(),
            StringUnit {
                value: value.map(str::to_string),
                annotation: None,
            },
        );
    }

    pub fn annotation(&self, location: &Location) -> Option<TranslationAnnotation> {
        self.units
            .get(location)
            .and_then(|unit| unit.annotation.clone())
    }

    /// Transactions ended so far, oldest first
    pub async fn journal(&self) -> Vec<TransactionRecord> {
        self.journal.lock().await.clone()
    }
}

#[async_trait]
impl Document for MemoryDocument {
    async fn start_transaction(&self, label: &str) -> Result<TransactionId, ArgosError> {
        let mut open = self.open.lock().await;
        if let Some(tx) = open.as_ref() {
            return Err(ArgosError::Transaction(format!(
                "transaction {} is still open",
                tx.id
            )));
        }

        let mut journal = self.journal.lock().await;
        let id = journal.last().map(|record| record.id + 1).unwrap_or(1);
        journal.push(TransactionRecord {
            id,
            label: label.to_string(),
            started_at: chrono::Utc::now().timestamp(),
            ended_at: None,
            committed: false,
        });
        *open = Some(OpenTransaction {
            id,
            undo: Vec::new(),
        });
        Ok(id)
    }

    async fn end_transaction(&self, id: TransactionId, commit: bool) -> Result<(), ArgosError> {
        let mut open = self.open.lock().await;
        let tx = match open.take() {
            Some(tx) if tx.id == id => tx,
            other => {
                *open = other;
                return Err(ArgosError::Transaction(format!(
                    "transaction {} is not open",
                    id
                )));
            }
        };

        if !commit {
            for (location, previous) in tx.undo.into_iter().rev() {
                if let Some(mut unit) = self.units.get_mut(&location) {
                    unit.annotation = previous;
                }
            }
        }

        let mut journal = self.journal.lock().await;
        if let Some(record) = journal.iter_mut().find(|record| record.id == id) {
            record.ended_at = Some(chrono::Utc::now().timestamp());
            record.committed = commit;
        }
        Ok(())
    }

    async fn string_at(&self, location: &Location) -> Result<Option<String>, ArgosError> {
        Ok(self.units.get(location).and_then(|unit| unit.value.clone()))
    }

    async fn annotation_at(
        &self,
        location: &Location,
    ) -> Result<Option<TranslationAnnotation>, ArgosError> {
        Ok(self.annotation(location))
    }

    async fn set_translation(
        &self,
        location: &Location,
        annotation: TranslationAnnotation,
    ) -> Result<(), ArgosError> {
        let mut open = self.open.lock().await;
        let Some(tx) = open.as_mut() else {
            return Err(ArgosError::Transaction(
                "annotations can only be written inside a transaction".to_string(),
            ));
        };

        let mut unit = self
            .units
            .get_mut(location)
            .ok_or_else(|| ArgosError::UnknownLocation(location.to_string()))?;
        let previous = unit.annotation.replace(annotation);
        tx.undo.push((location.clone(), previous));
        Ok(())
    }

    async fn locations(&self) -> Result<Vec<Location>, ArgosError> {
        let mut locations: Vec<Location> =
            self.units.iter().map(|entry| entry.key().clone()).collect();
        locations.sort();
        Ok(locations)
    }
}
