//! Persistence port and adapters for active and archived tasks.
//!
//! The lifecycle engine only talks to [`TaskRepository`]. `JsonFileRepository`
//! keeps the two collections as pretty-printed JSON arrays on disk, and
//! `InMemoryRepository` backs tests and dry runs.

use std::cell::RefCell;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{StorageError, StorageResult};
use crate::store::TaskStore;
use crate::task::Task;

/// Task persistence contract.
pub trait TaskRepository {
    /// Load the active collection in stored order.
    ///
    /// A repository with nothing stored yet returns an empty collection.
    fn load_active(&self) -> StorageResult<Vec<Task>>;

    /// Replace the stored active collection with `tasks`.
    fn save_active(&self, tasks: &[Task]) -> StorageResult<()>;

    /// Append one terminal-state snapshot to the archive.
    fn append_archive(&self, snapshot: &Task) -> StorageResult<()>;

    /// Load every archived snapshot in the order it was appended.
    fn load_archive(&self) -> StorageResult<Vec<Task>>;
}

/// Load the active store, falling back to an empty one when the stored data
/// cannot be read.
///
/// IDs already used by archived snapshots are reserved so they are never
/// handed out again.
pub fn load_store(repo: &impl TaskRepository) -> TaskStore {
    let mut store = match repo.load_active() {
        Ok(tasks) => TaskStore::from_tasks(tasks),
        Err(e) => {
            warn!("Error loading tasks, starting fresh: {e}");
            TaskStore::new()
        }
    };
    match repo.load_archive() {
        Ok(archived) => {
            if let Some(max) = archived.iter().map(|t| t.id).max() {
                store.reserve_through(max);
            }
        }
        Err(e) => warn!("Error reading archive, archived IDs not reserved: {e}"),
    }
    debug!(tasks = store.len(), next_id = store.next_id(), "store loaded");
    store
}

/// JSON-file repository holding `tasks.json` and `archived_tasks.json`.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    active_path: PathBuf,
    archive_path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(active_path: impl Into<PathBuf>, archive_path: impl Into<PathBuf>) -> Self {
        Self {
            active_path: active_path.into(),
            archive_path: archive_path.into(),
        }
    }

    pub fn active_path(&self) -> &Path {
        &self.active_path
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }
}

/// Read a JSON array of tasks, treating a missing file as empty.
fn read_tasks(path: &Path) -> StorageResult<Option<Vec<Task>>> {
    let buf = match fs::read_to_string(path) {
        Ok(buf) => buf,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    if buf.trim().is_empty() {
        return Ok(Some(Vec::new()));
    }
    serde_json::from_str(&buf).map(Some).map_err(|e| StorageError::json(path, e))
}

/// Write JSON via a temp file and rename so readers never see a partial file.
fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let data = serde_json::to_string_pretty(value).map_err(|e| StorageError::json(path, e))?;
    let tmp = path.with_extension("json.tmp");
    let mut f = File::create(&tmp).map_err(|e| StorageError::io(&tmp, e))?;
    f.write_all(data.as_bytes()).map_err(|e| StorageError::io(&tmp, e))?;
    f.flush().map_err(|e| StorageError::io(&tmp, e))?;
    f.sync_all().map_err(|e| StorageError::io(&tmp, e))?;
    fs::rename(&tmp, path).map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

impl TaskRepository for JsonFileRepository {
    fn load_active(&self) -> StorageResult<Vec<Task>> {
        match read_tasks(&self.active_path)? {
            Some(tasks) => Ok(tasks),
            None => {
                debug!(path = %self.active_path.display(), "no task file, initialising empty store");
                write_atomic(&self.active_path, &Vec::<Task>::new())?;
                Ok(Vec::new())
            }
        }
    }

    fn save_active(&self, tasks: &[Task]) -> StorageResult<()> {
        write_atomic(&self.active_path, tasks)
    }

    fn append_archive(&self, snapshot: &Task) -> StorageResult<()> {
        let mut archived = read_tasks(&self.archive_path)?.unwrap_or_default();
        archived.push(snapshot.clone());
        write_atomic(&self.archive_path, &archived)
    }

    fn load_archive(&self) -> StorageResult<Vec<Task>> {
        Ok(read_tasks(&self.archive_path)?.unwrap_or_default())
    }
}

/// Repository that keeps both collections in memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    active: RefCell<Vec<Task>>,
    archive: RefCell<Vec<Task>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskRepository for InMemoryRepository {
    fn load_active(&self) -> StorageResult<Vec<Task>> {
        Ok(self.active.borrow().clone())
    }

    fn save_active(&self, tasks: &[Task]) -> StorageResult<()> {
        *self.active.borrow_mut() = tasks.to_vec();
        Ok(())
    }

    fn append_archive(&self, snapshot: &Task) -> StorageResult<()> {
        self.archive.borrow_mut().push(snapshot.clone());
        Ok(())
    }

    fn load_archive(&self) -> StorageResult<Vec<Task>> {
        Ok(self.archive.borrow().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Origin, Priority, Status};
    use chrono::{TimeZone, Utc};

    fn task(id: u64, status: Status) -> Task {
        Task {
            id,
            title: format!("task {id}"),
            description: None,
            priority: Priority::Medium,
            origin: Origin::Email,
            status,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    #[test]
    fn test_missing_active_file_is_created_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("tasks.json"), dir.path().join("archive.json"));
        assert!(repo.load_active().unwrap().is_empty());
        assert_eq!(fs::read_to_string(repo.active_path()).unwrap().trim(), "[]");
        assert!(repo.load_archive().unwrap().is_empty());
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("tasks.json"), dir.path().join("archive.json"));
        repo.save_active(&[task(1, Status::Pending)]).unwrap();
        assert!(!dir.path().join("tasks.json.tmp").exists());
        assert_eq!(repo.load_active().unwrap(), vec![task(1, Status::Pending)]);
    }

    #[test]
    fn test_append_archive_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path().join("tasks.json"), dir.path().join("archive.json"));
        repo.append_archive(&task(2, Status::Deleted)).unwrap();
        repo.append_archive(&task(1, Status::Archived)).unwrap();
        let ids: Vec<u64> = repo.load_archive().unwrap().iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "{ not json").unwrap();
        let repo = JsonFileRepository::new(&path, dir.path().join("archive.json"));
        assert!(matches!(repo.load_active(), Err(StorageError::Json { .. })));
    }

    #[test]
    fn test_load_store_falls_back_to_empty_and_reserves_archived_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");
        fs::write(&path, "garbage").unwrap();
        let repo = JsonFileRepository::new(&path, dir.path().join("archive.json"));
        repo.append_archive(&task(5, Status::Deleted)).unwrap();
        let store = load_store(&repo);
        assert!(store.is_empty());
        assert_eq!(store.next_id(), 6);
    }
}
