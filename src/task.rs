//! Task data structure and related functionality.
//!
//! This module defines the `Task` record stored in both the active collection and
//! the archive, plus `NewTask`, the input accepted when creating one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A unit of work tracked from creation until it is archived or deleted.
///
/// The same record is used for archive snapshots: a snapshot is simply a clone
/// taken when the task reaches a terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub priority: Priority,
    pub origin: Origin,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Time between creation and completion, for completed tasks only.
    pub fn execution_time(&self) -> Option<Duration> {
        match (self.status, self.completed_at) {
            (Status::Completed, Some(done)) => Some(done - self.created_at),
            _ => None,
        }
    }

    /// Copy of this task carrying a terminal status, ready for the archive sink.
    pub fn snapshot(&self, status: Status) -> Task {
        Task { status, ..self.clone() }
    }
}

/// Fields supplied by the caller when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub origin: Origin,
}

impl NewTask {
    pub fn new(title: impl Into<String>, priority: Priority, origin: Origin) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority,
            origin,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
