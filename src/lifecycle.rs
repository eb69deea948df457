//! Task lifecycle engine.
//!
//! `Lifecycle` drives tasks through `Pending -> InProgress -> Completed -> Archived`,
//! with deletion allowed from any non-terminal status. It keeps at most one task
//! in progress, picks the next task by priority tier, and moves terminal tasks
//! out of the active store into the archive.

use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::error::{TaskError, TaskResult};
use crate::fields::{Priority, Status};
use crate::storage::TaskRepository;
use crate::store::TaskStore;
use crate::task::{NewTask, Task};

/// Completed tasks older than this are archived by default.
pub const DEFAULT_ARCHIVE_AFTER_DAYS: i64 = 7;

/// Default archival threshold as a duration.
pub fn default_archive_threshold() -> Duration {
    Duration::days(DEFAULT_ARCHIVE_AFTER_DAYS)
}

/// Lifecycle operations over a borrowed store.
///
/// The archive sink is written before a terminal task leaves the store, so a
/// failed write never loses the task.
pub struct Lifecycle<'a, R, C>
where
    R: TaskRepository,
    C: Clock,
{
    store: &'a mut TaskStore,
    archive: &'a R,
    clock: &'a C,
}

impl<'a, R, C> Lifecycle<'a, R, C>
where
    R: TaskRepository,
    C: Clock,
{
    pub fn new(store: &'a mut TaskStore, archive: &'a R, clock: &'a C) -> Self {
        Self { store, archive, clock }
    }

    pub fn store(&self) -> &TaskStore {
        &*self.store
    }

    /// Create a pending task stamped with the engine's clock.
    pub fn create(&mut self, new: NewTask) -> TaskResult<Task> {
        let task = self.store.create(new, self.clock)?;
        info!(id = task.id, title = %task.title, "created task");
        Ok(task)
    }

    /// Start the highest-priority pending task.
    ///
    /// # Errors
    ///
    /// [`TaskError::Conflict`] when a task is already in progress, and
    /// [`TaskError::NotFound`] when nothing is pending.
    pub fn select_next(&mut self) -> TaskResult<Task> {
        if let Some(current) = self.store.in_progress() {
            return Err(TaskError::conflict(format!(
                "task {} '{}' is already in progress",
                current.id, current.title
            )));
        }

        // min_by_key keeps the first of equal keys, so insertion order breaks ties.
        let id = self
            .store
            .all()
            .iter()
            .filter(|t| t.status == Status::Pending)
            .min_by_key(|t| t.priority)
            .map(|t| t.id)
            .ok_or_else(|| TaskError::not_found("there are no pending tasks"))?;

        let task = self.transition(id, Status::InProgress)?;
        info!(id = task.id, priority = %task.priority, "selected next task");
        Ok(task.clone())
    }

    /// Overwrite the priority of any active task.
    ///
    /// No status guard applies: completed tasks still awaiting archival can be
    /// re-prioritised too.
    pub fn update_priority(&mut self, id: u64, priority: Priority) -> TaskResult<Task> {
        let task = self
            .store
            .find_mut(id)
            .ok_or_else(|| TaskError::not_found(format!("task {id} not found")))?;
        let previous = task.priority;
        task.priority = priority;
        info!(id, from = %previous, to = %priority, "updated priority");
        Ok(task.clone())
    }

    /// Mark the in-progress task completed.
    pub fn complete(&mut self) -> TaskResult<Task> {
        let id = self
            .store
            .in_progress()
            .map(|t| t.id)
            .ok_or_else(|| TaskError::not_found("no task is in progress"))?;
        let now = self.clock.utc();
        let task = self.transition(id, Status::Completed)?;
        task.completed_at = Some(now);
        info!(id, "completed task");
        Ok(task.clone())
    }

    /// Archive completed tasks finished more than `threshold` before `now`.
    ///
    /// Returns how many tasks were archived. Tasks completed exactly
    /// `threshold` ago stay active.
    pub fn archive_stale(&mut self, now: DateTime<Utc>, threshold: Duration) -> TaskResult<usize> {
        let eligible: Vec<u64> = self
            .store
            .all()
            .iter()
            .filter(|t| is_stale(t, now, threshold))
            .map(|t| t.id)
            .collect();
        debug!(candidates = eligible.len(), "archival pass");

        let mut archived = 0;
        for id in eligible {
            self.retire(id, Status::Archived)?;
            archived += 1;
        }
        if archived > 0 {
            info!(count = archived, "archived stale tasks");
        }
        Ok(archived)
    }

    /// Archive stale tasks as of the engine's clock.
    pub fn archive_due(&mut self, threshold: Duration) -> TaskResult<usize> {
        let now = self.clock.utc();
        self.archive_stale(now, threshold)
    }

    /// Delete an active task, keeping a snapshot in the archive.
    pub fn delete_task(&mut self, id: u64) -> TaskResult<Task> {
        if self.store.find(id).is_none() {
            return Err(TaskError::not_found(format!("task {id} not found")));
        }
        let snapshot = self.retire(id, Status::Deleted)?;
        info!(id, "deleted task");
        Ok(snapshot)
    }

    /// Move a task to a terminal status: write its snapshot, then drop it from the store.
    fn retire(&mut self, id: u64, status: Status) -> TaskResult<Task> {
        let snapshot = {
            let task = self
                .store
                .find(id)
                .ok_or_else(|| TaskError::not_found(format!("task {id} not found")))?;
            check_transition(task, status)?;
            task.snapshot(status)
        };
        if let Err(e) = self.archive.append_archive(&snapshot) {
            warn!(id, "archive write failed, task kept active: {e}");
            return Err(e.into());
        }
        self.store.remove(id)?;
        Ok(snapshot)
    }

    fn transition(&mut self, id: u64, next: Status) -> TaskResult<&mut Task> {
        let task = self
            .store
            .find_mut(id)
            .ok_or_else(|| TaskError::not_found(format!("task {id} not found")))?;
        check_transition(task, next)?;
        task.status = next;
        Ok(task)
    }
}

fn check_transition(task: &Task, next: Status) -> TaskResult<()> {
    if task.status.can_transition_to(next) {
        Ok(())
    } else {
        Err(TaskError::conflict(format!(
            "task {} cannot move from {} to {}",
            task.id, task.status, next
        )))
    }
}

/// Whether a task is completed and has been for strictly longer than `threshold`.
pub fn is_stale(task: &Task, now: DateTime<Utc>, threshold: Duration) -> bool {
    match (task.status, task.completed_at) {
        (Status::Completed, Some(done)) => now - done > threshold,
        _ => false,
    }
}
