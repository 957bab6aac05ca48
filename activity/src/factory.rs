use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::LedgerConfig;
use crate::error::StorageError;
use crate::ledger::Ledger;
use crate::store::FileStore;
use crate::store::InMemoryStore;
use crate::store::KeyValueStore;
#[cfg(feature = "sqlite")]
use crate::store::SqliteStore;

/// Selects the backend: `file` (default), `sqlite` or `memory`.
pub const BACKEND_ENV: &str = "STOCKROOM_ACTIVITY_BACKEND";
/// Overrides the store directory.
pub const DIR_ENV: &str = "STOCKROOM_ACTIVITY_DIR";

/// Backend selection for activity persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    File,
    /// Process-local; nothing outlives the process.
    Memory,
    #[cfg(feature = "sqlite")]
    Sqlite,
}

/// Map a backend name to a backend. Unknown names, and `sqlite` when it is
/// not compiled in, fall back to [`Backend::File`].
pub fn parse_backend(name: &str) -> Backend {
    match name.trim().to_ascii_lowercase().as_str() {
        #[cfg(feature = "sqlite")]
        "sqlite" => Backend::Sqlite,
        "" | "file" | "json" => Backend::File,
        "memory" => Backend::Memory,
        other => {
            tracing::warn!("activity store: backend `{other}` unavailable, using file");
            Backend::File
        }
    }
}

/// Choose backend using env `STOCKROOM_ACTIVITY_BACKEND` if present.
pub fn choose_backend_from_env() -> Backend {
    parse_backend(&std::env::var(BACKEND_ENV).unwrap_or_default())
}

/// Where the store lives: an explicit directory, else `$STOCKROOM_ACTIVITY_DIR`,
/// else `~/.stockroom/activity`. `None` when no home directory is known.
pub fn resolve_store_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = explicit {
        return Some(dir.to_path_buf());
    }
    if let Some(dir) = std::env::var_os(DIR_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| default_store_dir(&home))
}

pub fn default_store_dir(home: &Path) -> PathBuf {
    home.join(".stockroom").join("activity")
}

/// Build the key/value store for `dir`.
pub fn open_storage(
    dir: &Path,
    backend: Option<Backend>,
) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    let be = backend.unwrap_or_else(choose_backend_from_env);
    Ok(match be {
        Backend::File => {
            std::fs::create_dir_all(dir)?;
            Arc::new(FileStore::new(dir))
        }
        Backend::Memory => Arc::new(InMemoryStore::new()),
        #[cfg(feature = "sqlite")]
        Backend::Sqlite => {
            std::fs::create_dir_all(dir)?;
            Arc::new(SqliteStore::new(dir.join("activity.db")))
        }
    })
}

/// Build a ledger over `dir`, or a detached ledger when there is no directory.
pub fn open_ledger(
    dir: Option<&Path>,
    backend: Option<Backend>,
    config: LedgerConfig,
) -> Result<Ledger, StorageError> {
    match dir {
        Some(dir) => Ok(Ledger::new(open_storage(dir, backend)?, config)),
        None => {
            tracing::warn!("activity store: no store directory; activity will not be persisted");
            Ok(Ledger::detached(config))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_backends_fall_back_to_file() {
        assert_eq!(parse_backend(""), Backend::File);
        assert_eq!(parse_backend("FILE"), Backend::File);
        assert_eq!(parse_backend("carrier-pigeon"), Backend::File);
        assert_eq!(parse_backend(" Memory "), Backend::Memory);
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_is_selectable_when_compiled() {
        assert_eq!(parse_backend("SQLite"), Backend::Sqlite);
    }

    #[test]
    fn explicit_dir_wins() {
        let dir = Path::new("/srv/stockroom");
        assert_eq!(resolve_store_dir(Some(dir)), Some(dir.to_path_buf()));
        assert_eq!(
            default_store_dir(Path::new("/home/ops")),
            PathBuf::from("/home/ops/.stockroom/activity")
        );
    }

    #[test]
    fn memory_backend_leaves_the_filesystem_alone() {
        let root = tempfile::tempdir().unwrap();
        let dir = root.path().join("activity");
        let storage = open_storage(&dir, Some(Backend::Memory)).unwrap();
        storage.set("k", "v").unwrap();
        assert!(!dir.exists());

        open_storage(&dir, Some(Backend::File)).unwrap();
        assert!(dir.is_dir());
    }

    #[test]
    fn missing_dir_yields_detached_ledger() {
        let ledger = open_ledger(None, None, LedgerConfig::default()).unwrap();
        assert!(!ledger.is_attached());
    }
}
