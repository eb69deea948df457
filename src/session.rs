//! A loaded task store bound to its repository and clock.
//!
//! Both the one-shot CLI commands and the interactive menu work through a
//! `Session`: load once, run lifecycle operations, save the active set.

use chrono::Duration;
use mockable::Clock;
use tracing::warn;

use crate::error::TaskResult;
use crate::lifecycle::{default_archive_threshold, Lifecycle};
use crate::report::{active_report, archived_report, ReportRow};
use crate::storage::{load_store, TaskRepository};
use crate::store::TaskStore;

pub struct Session<R: TaskRepository, C: Clock> {
    repo: R,
    clock: C,
    store: TaskStore,
    archive_threshold: Duration,
}

impl<R: TaskRepository, C: Clock> Session<R, C> {
    /// Load the active store from `repo`, starting empty if it cannot be read.
    pub fn open(repo: R, clock: C) -> Self {
        let store = load_store(&repo);
        Self {
            repo,
            clock,
            store,
            archive_threshold: default_archive_threshold(),
        }
    }

    pub fn with_archive_threshold(mut self, threshold: Duration) -> Self {
        self.archive_threshold = threshold;
        self
    }

    /// Lifecycle engine over this session's store.
    pub fn engine(&mut self) -> Lifecycle<'_, R, C> {
        Lifecycle::new(&mut self.store, &self.repo, &self.clock)
    }

    /// Archive completed tasks older than the configured threshold.
    pub fn archive_stale(&mut self) -> TaskResult<usize> {
        let threshold = self.archive_threshold;
        self.engine().archive_due(threshold)
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn active_rows(&self) -> Vec<ReportRow> {
        active_report(&self.store).collect()
    }

    pub fn archived_rows(&self) -> TaskResult<Vec<ReportRow>> {
        archived_report(&self.repo)
    }

    /// Persist the active collection.
    pub fn save(&self) -> TaskResult<()> {
        if let Err(e) = self.repo.save_active(self.store.all()) {
            warn!("Error saving tasks: {e}");
            return Err(e.into());
        }
        Ok(())
    }
}
