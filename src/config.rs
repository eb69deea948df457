//! Runtime configuration: where task files live and when tasks are archived.
//!
//! The data directory is taken from `--dir`, then the `TASKQ_DIR` environment
//! variable, then `~/.taskq`. Both collections live side by side in it.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Duration;
use tracing::warn;

use crate::lifecycle::DEFAULT_ARCHIVE_AFTER_DAYS;
use crate::storage::JsonFileRepository;

pub const DIR_ENV: &str = "TASKQ_DIR";
pub const ACTIVE_FILE: &str = "tasks.json";
pub const ARCHIVE_FILE: &str = "archived_tasks.json";

/// Largest accepted archive threshold, roughly a century.
pub const MAX_ARCHIVE_AFTER_DAYS: i64 = 36_500;

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub archive_after_days: i64,
}

impl Config {
    /// Resolve the data directory from an explicit path, the environment, or `$HOME`.
    pub fn resolve(dir: Option<PathBuf>) -> Self {
        let data_dir = dir
            .or_else(|| std::env::var_os(DIR_ENV).map(PathBuf::from))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".taskq")
            });
        Self::with_dir(data_dir)
    }

    pub fn with_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            archive_after_days: DEFAULT_ARCHIVE_AFTER_DAYS,
        }
    }

    pub fn active_path(&self) -> PathBuf {
        self.data_dir.join(ACTIVE_FILE)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.data_dir.join(ARCHIVE_FILE)
    }

    /// Archive threshold, kept within `0..=MAX_ARCHIVE_AFTER_DAYS` days.
    pub fn archive_threshold(&self) -> Duration {
        Duration::days(self.archive_after_days.clamp(0, MAX_ARCHIVE_AFTER_DAYS))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Open the JSON repository in the data directory, creating it if needed.
    ///
    /// A directory that cannot be created is only logged: loads then fall back
    /// to an empty store and the first write reports the error.
    pub fn open_repository(&self) -> JsonFileRepository {
        if let Err(e) = fs::create_dir_all(&self.data_dir) {
            warn!(dir = %self.data_dir.display(), "cannot create data directory: {e}");
        }
        JsonFileRepository::new(self.active_path(), self.archive_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::error::TaskError;
    use crate::session::Session;
    use chrono::Utc;

    #[test]
    fn test_explicit_dir_wins() {
        let cfg = Config::resolve(Some(PathBuf::from("/tmp/tq-test")));
        assert_eq!(cfg.active_path(), PathBuf::from("/tmp/tq-test/tasks.json"));
        assert_eq!(cfg.archive_path(), PathBuf::from("/tmp/tq-test/archived_tasks.json"));
        assert_eq!(cfg.archive_threshold(), Duration::days(7));
    }

    #[test]
    fn test_open_repository_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = Config::with_dir(tmp.path().join("nested").join("data"));
        let repo = cfg.open_repository();
        assert!(cfg.data_dir().is_dir());
        assert_eq!(repo.active_path(), cfg.active_path());
    }

    #[test]
    fn test_uncreatable_dir_still_opens_empty_session() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let cfg = Config::with_dir(blocker.join("taskq"));

        let session = Session::open(cfg.open_repository(), FixedClock::new(Utc::now()));
        assert!(session.store().is_empty());
        assert!(session.active_rows().is_empty());
        assert!(session.archived_rows().is_err());
        assert!(matches!(session.save(), Err(TaskError::Storage(_))));
    }

    #[test]
    fn test_archive_threshold_never_overflows() {
        let mut cfg = Config::with_dir("/tmp/tq-test");
        cfg.archive_after_days = 200_000_000_000_000;
        assert_eq!(cfg.archive_threshold(), Duration::days(MAX_ARCHIVE_AFTER_DAYS));
        cfg.archive_after_days = -3;
        assert_eq!(cfg.archive_threshold(), Duration::zero());
    }
}
