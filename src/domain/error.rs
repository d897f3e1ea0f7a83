use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArgosError {
    #[error("Database error: {0}")]
    Database(#[from] tokio_rusqlite::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transaction error: {0}")]
    Transaction(String),

    #[error("Failed to launch translator '{path}': {source}")]
    Spawn {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Translator did not finish within {0:?}")]
    Timeout(std::time::Duration),

    #[error("Task error: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Unknown location: {0}")]
    UnknownLocation(String),

    #[error("Import error at line {line}: {message}")]
    Import { line: usize, message: String },
}
