//! In-memory store for active tasks.
//!
//! `TaskStore` owns the ordered collection of tasks that are not yet archived or
//! deleted, together with the ID allocator. Insertion order is preserved and is
//! what breaks ties during selection.

use mockable::Clock;
use tracing::debug;

use crate::error::{TaskError, TaskResult};
use crate::fields::Status;
use crate::task::{NewTask, Task};
use crate::validation::{optional_text, require_text};

/// Ordered collection of active tasks.
#[derive(Debug)]
pub struct TaskStore {
    tasks: Vec<Task>,
    next_id: u64,
}

impl Default for TaskStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskStore {
    /// Create an empty store whose first task will get ID 1.
    pub fn new() -> Self {
        Self { tasks: Vec::new(), next_id: 1 }
    }

    /// Build a store from persisted tasks, continuing IDs after the highest one seen.
    pub fn from_tasks(tasks: Vec<Task>) -> Self {
        let next_id = tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        Self { tasks, next_id }
    }

    /// ID the next created task will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Create a pending task and append it to the store.
    pub fn create(&mut self, new: NewTask, clock: &impl Clock) -> TaskResult<Task> {
        let title = require_text("title", &new.title)?;
        let task = Task {
            id: self.next_id,
            title,
            description: optional_text(new.description.as_deref()),
            priority: new.priority,
            origin: new.origin,
            status: Status::Pending,
            created_at: clock.utc(),
            completed_at: None,
        };
        self.next_id += 1;
        self.tasks.push(task.clone());
        debug!(id = task.id, priority = %task.priority, "task created");
        Ok(task)
    }

    /// Get a task by ID.
    pub fn find(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn find_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// All active tasks in insertion order.
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    /// The task currently being worked on, if any.
    pub fn in_progress(&self) -> Option<&Task> {
        self.tasks.iter().find(|t| t.status == Status::InProgress)
    }

    /// Remove a task from the store, returning it.
    pub fn remove(&mut self, id: u64) -> TaskResult<Task> {
        let idx = self
            .tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::not_found(format!("task {id} not found")))?;
        Ok(self.tasks.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Make sure IDs up to and including `id` are never handed out again.
    ///
    /// Used at load time so IDs of archived or deleted tasks stay retired.
    pub fn reserve_through(&mut self, id: u64) {
        self.next_id = self.next_id.max(id + 1);
    }
}
