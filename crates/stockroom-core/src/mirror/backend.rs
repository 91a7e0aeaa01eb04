// ── Mirror persistence backends ──
//
// A backend maps a named entry to a JSON string. Calls are blocking and
// run on tokio's blocking pool (see `MirrorStore`).

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing::trace;

use crate::error::CoreError;

/// Durable key-value storage for mirror entries.
pub trait MirrorBackend: fmt::Debug + Send + Sync {
    /// Read an entry. `Ok(None)` when it has never been written.
    fn load(&self, key: &str) -> Result<Option<String>, CoreError>;

    /// Replace an entry.
    fn store(&self, key: &str, value: &str) -> Result<(), CoreError>;
}

// ── File backend ────────────────────────────────────────────────────

/// One `<key>.json` file per entry inside a directory. Writes go to a
/// sibling temp file first and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl MirrorBackend for FileBackend {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let path = self.entry_path(key);
        match fs::read_to_string(&path) {
            Ok(text) => {
                trace!(path = %path.display(), bytes = text.len(), "mirror entry read");
                Ok(Some(text))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CoreError::mirror(format!(
                "failed to read {}: {e}",
                path.display()
            ))),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CoreError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            CoreError::mirror(format!("failed to create {}: {e}", self.dir.display()))
        })?;

        let path = self.entry_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));
        fs::write(&tmp, value)
            .map_err(|e| CoreError::mirror(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).map_err(|e| {
            CoreError::mirror(format!("failed to replace {}: {e}", path.display()))
        })?;

        trace!(path = %path.display(), bytes = value.len(), "mirror entry written");
        Ok(())
    }
}

// ── Memory backend ──────────────────────────────────────────────────

/// Process-local entries, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MirrorBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>, CoreError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::mirror("memory backend lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), CoreError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| CoreError::mirror("memory backend lock poisoned"))?;
        entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}
