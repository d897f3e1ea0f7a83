use crate::domain::error::ArgosError;
use crate::domain::model::{Location, TranslationAnnotation};
use crate::domain::traits::{Document, TransactionId};
use async_trait::async_trait;
use rusqlite::OptionalExtension;
use serde::Serialize;
use std::path::Path;
use tokio::sync::Mutex;
use tokio_rusqlite::{params, Connection};

#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub id: TransactionId,
    pub label: String,
    pub started_at: i64,
    pub ended_at: Option<i64>,
    pub committed: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct DocumentStats {
    pub strings: usize,
    pub translated: usize,
}

/// SQLite-backed program document
///
/// Each row of `strings` is one string data unit keyed by its address.
/// Only one transaction may be open at a time and annotation writes are
/// rejected outside of it.
pub struct SqliteDocument {
    conn: Connection,
    active: Mutex<Option<TransactionId>>,
}

pub async fn init_database(db_path: &Path) -> Result<Connection, ArgosError> {
    let db = Connection::open(db_path.to_path_buf()).await?;
    create_schema(&db).await?;
    Ok(db)
}

async fn create_schema(db: &Connection) -> Result<(), ArgosError> {
    db.call(|conn| {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS strings (
                address TEXT PRIMARY KEY,
                value TEXT,
                translated TEXT,
                show_translated INTEGER NOT NULL DEFAULT 0,
                updated_at INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS transactions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL,
                started_at INTEGER NOT NULL,
                ended_at INTEGER,
                committed INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        Ok::<_, rusqlite::Error>(())
    })
    .await?;

    Ok(())
}

impl SqliteDocument {
    pub fn new(conn: Connection) -> Self {
        Self {
            conn,
            active: Mutex::new(None),
        }
    }

    pub async fn open(db_path: &Path) -> Result<Self, ArgosError> {
        Ok(Self::new(init_database(db_path).await?))
    }

    pub async fn open_in_memory() -> Result<Self, ArgosError> {
        let conn = Connection::open_in_memory().await?;
        create_schema(&conn).await?;
        Ok(Self::new(conn))
    }

    /// Insert or replace string values; existing annotations are kept.
    pub async fn import_strings(&self, items: Vec<(Location, String)>) -> Result<usize, ArgosError> {
        if items.is_empty() {
            return Ok(0);
        }
        if let Some(id) = *self.active.lock().await {
            return Err(ArgosError::Transaction(format!(
                "cannot import while transaction {} is open",
                id
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let count = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let mut stmt = tx.prepare(
                    "INSERT INTO strings (address, value, updated_at) VALUES (?, ?, ?)
                     ON CONFLICT(address) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                )?;

                let mut count = 0;
                for (location, value) in items {
                    stmt.execute(params![location.as_str(), value, now])?;
                    count += 1;
                }

                stmt.finalize()?;
                tx.commit()?;
                Ok::<_, rusqlite::Error>(count)
            })
            .await?;

        Ok(count)
    }

    pub async fn stats(&self) -> Result<DocumentStats, ArgosError> {
        let (strings, translated) = self
            .conn
            .call(|conn| {
                conn.query_row(
                    "SELECT COUNT(*), COUNT(translated) FROM strings",
                    [],
                    |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)),
                )
            })
            .await?;

        Ok(DocumentStats {
            strings: strings as usize,
            translated: translated as usize,
        })
    }

    /// Most recent transactions first
    pub async fn recent_transactions(
        &self,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, ArgosError> {
        let limit = limit as i64;
        let records = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, label, started_at, ended_at, committed
                     FROM transactions ORDER BY id DESC LIMIT ?",
                )?;
                let rows = stmt.query_map(params![limit], |row| {
                    Ok(TransactionRecord {
                        id: row.get(0)?,
                        label: row.get(1)?,
                        started_at: row.get(2)?,
                        ended_at: row.get(3)?,
                        committed: row.get(4)?,
                    })
                })?;
                rows.collect::<Result<Vec<_>, rusqlite::Error>>()
            })
            .await?;

        Ok(records)
    }
}

#[async_trait]
impl Document for SqliteDocument {
    async fn start_transaction(&self, label: &str) -> Result<TransactionId, ArgosError> {
        let mut active = self.active.lock().await;
        if let Some(id) = *active {
            return Err(ArgosError::Transaction(format!(
                "transaction {} is still open",
                id
            )));
        }

        let label = label.to_string();
        let now = chrono::Utc::now().timestamp();
        let id = self
            .conn
            .call(move |conn| {
                conn.execute_batch("BEGIN IMMEDIATE")?;
                match conn.execute(
                    "INSERT INTO transactions (label, started_at) VALUES (?, ?)",
                    params![label, now],
                ) {
                    Ok(_) => Ok(conn.last_insert_rowid()),
                    Err(e) => {
                        let _ = conn.execute_batch("ROLLBACK");
                        Err(e)
                    }
                }
            })
            .await?;

        *active = Some(id);
        tracing::debug!(transaction = id, "transaction started");
        Ok(id)
    }

    async fn end_transaction(&self, id: TransactionId, commit: bool) -> Result<(), ArgosError> {
        let mut active = self.active.lock().await;
        if *active != Some(id) {
            return Err(ArgosError::Transaction(format!(
                "transaction {} is not open",
                id
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let result = self
            .conn
            .call(move |conn| {
                let journaled = conn.execute(
                    "UPDATE transactions SET ended_at = ?, committed = ? WHERE id = ?",
                    params![now, commit, id],
                );
                if commit && journaled.is_ok() {
                    // a failed COMMIT leaves the transaction open on the connection
                    match conn.execute_batch("COMMIT") {
                        Ok(()) => Ok(()),
                        Err(e) => {
                            let _ = conn.execute_batch("ROLLBACK");
                            Err(e)
                        }
                    }
                } else {
                    conn.execute_batch("ROLLBACK")?;
                    journaled.map(|_| ())
                }
            })
            .await;

        *active = None;
        tracing::debug!(transaction = id, commit, "transaction ended");
        result.map_err(ArgosError::from)
    }

    async fn string_at(&self, location: &Location) -> Result<Option<String>, ArgosError> {
        let address = location.as_str().to_string();
        let value = self
            .conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT value FROM strings WHERE address = ?",
                    params![address],
                    |row| row.get::<_, Option<String>>(0),
                )
                .optional()
            })
            .await?;

        Ok(value.flatten())
    }

    async fn annotation_at(
        &self,
        location: &Location,
    ) -> Result<Option<TranslationAnnotation>, ArgosError> {
        let address = location.as_str().to_string();
        let row = self
            .conn
            .call(move |conn| {
                conn.query_row(
                    "SELECT translated, show_translated FROM strings WHERE address = ?",
                    params![address],
                    |row| Ok((row.get::<_, Option<String>>(0)?, row.get::<_, bool>(1)?)),
                )
                .optional()
            })
            .await?;

        Ok(row.and_then(|(translated, show_translated)| {
            translated.map(|translated_value| TranslationAnnotation {
                translated_value,
                show_translated,
            })
        }))
    }

    async fn set_translation(
        &self,
        location: &Location,
        annotation: TranslationAnnotation,
    ) -> Result<(), ArgosError> {
        if self.active.lock().await.is_none() {
            return Err(ArgosError::Transaction(
                "annotations can only be written inside a transaction".to_string(),
            ));
        }

        let address = location.as_str().to_string();
        let now = chrono::Utc::now().timestamp();
        let updated = self
            .conn
            .call(move |conn| {
                conn.execute(
                    "UPDATE strings SET translated = ?, show_translated = ?, updated_at = ?
                     WHERE address = ?",
                    params![
                        annotation.translated_value,
                        annotation.show_translated,
                        now,
                        address
                    ],
                )
            })
            .await?;

        if updated == 0 {
            return Err(ArgosError::UnknownLocation(location.to_string()));
        }
        Ok(())
    }

    async fn locations(&self) -> Result<Vec<Location>, ArgosError> {
        let addresses = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare("SELECT address FROM strings")?;
                let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
                rows.collect::<Result<Vec<_>, rusqlite::Error>>()
            })
            .await?;

        // text order in SQL would put 0x1000 before 0x200
        let mut locations: Vec<Location> = addresses.into_iter().map(Location::new).collect();
        locations.sort();
        Ok(locations)
    }
}
