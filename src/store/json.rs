//! JSON file store: one `progress_<user>.json` per user

use std::ffi::OsString;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tracing::{debug, warn};

use super::{ProgressStore, StoreError, StoredProgress};
use crate::gamification::UserProgress;
use crate::identity::{Identity, UserId};

const FILE_PREFIX: &str = "progress_";
const FILE_SUFFIX: &str = ".json";

/// Directory of per-user JSON records
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Use `dir` for records. The directory is created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a user's record. The id is hex encoded, so distinct
    /// ids never share a file and no id can escape the directory.
    pub fn path_for(&self, user: &UserId) -> PathBuf {
        let key = hex::encode(user.as_str());
        self.dir.join(format!("{FILE_PREFIX}{key}{FILE_SUFFIX}"))
    }

    fn read_record(path: &Path) -> Result<Option<StoredProgress>, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(path, e)),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }
}

impl ProgressStore for JsonFileStore {
    fn load(&self, user: &UserId) -> Result<Option<UserProgress>, StoreError> {
        let path = self.path_for(user);
        let Some(record) = Self::read_record(&path)? else {
            return Ok(None);
        };
        if &record.user_id != user {
            warn!(path = %path.display(), "Progress file belongs to another user");
            return Ok(None);
        }
        Ok(Some(record.progress))
    }

    fn save(&mut self, identity: &Identity, progress: &UserProgress) -> Result<(), StoreError> {
        let record = StoredProgress {
            user_id: identity.id.clone(),
            name: identity.name.clone(),
            progress: progress.clone(),
        };
        let content = serde_json::to_vec_pretty(&record)?;
        let path = self.path_for(&identity.id);
        write_atomic(&path, &content)?;
        debug!(path = %path.display(), "Saved progress");
        Ok(())
    }

    fn records(&self) -> Result<Vec<StoredProgress>, StoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StoreError::io(&self.dir, e)),
        };

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StoreError::io(&self.dir, e))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(FILE_PREFIX) && name.ends_with(FILE_SUFFIX) {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            if let Some(record) = Self::read_record(&path)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(suffix);
    path.with_file_name(name)
}

/// Write a file with an exclusive lock and an atomic rename.
///
/// The lock lives in a separate `<file>.lock` so it survives the rename.
pub(crate) fn write_atomic(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let _lock = lock_exclusive(path)?;
    replace_file(path, content)
}

/// Take the exclusive `<file>.lock` for `path`, blocking until available.
/// The lock is released when the returned file is dropped.
pub(crate) fn lock_exclusive(path: &Path) -> Result<File, StoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
    }

    let lock_path = sibling(path, ".lock");
    let lock_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&lock_path)
        .map_err(|e| StoreError::io(&lock_path, e))?;
    lock_file
        .lock_exclusive()
        .map_err(|source| StoreError::Lock {
            path: lock_path.clone(),
            source,
        })?;
    Ok(lock_file)
}

/// Temp file, `sync_all`, rename. Callers must hold [`lock_exclusive`].
pub(crate) fn replace_file(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let temp_path = sibling(path, ".tmp");
    let mut temp_file = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&temp_path)
        .map_err(|e| StoreError::io(&temp_path, e))?;
    temp_file
        .write_all(content)
        .map_err(|e| StoreError::io(&temp_path, e))?;
    temp_file
        .sync_all()
        .map_err(|e| StoreError::io(&temp_path, e))?;

    std::fs::rename(&temp_path, path).map_err(|e| StoreError::io(path, e))
}
