use thiserror::Error;

/// Failure of the key/value store backing the ledger.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid storage key `{0}`")]
    InvalidKey(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger was built without a persistent store.
    #[error("no persistent storage is attached to the activity ledger")]
    Detached,

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stored activity log is unreadable: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to encode activity log: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export io: {0}")]
    Io(#[from] std::io::Error),

    #[error("export json: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown activity type `{0}` (expected CREATE, UPDATE or DELETE)")]
pub struct ParseActivityTypeError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid date `{0}`: expected RFC 3339 or YYYY-MM-DD")]
pub struct ParseDateError(pub String);
