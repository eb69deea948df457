//! # taskq - single-user task queue
//!
//! Tasks are created with a priority tier and an origin, picked one at a time in
//! priority order, completed, and archived once they have been done for a week.
//! Active and archived tasks live in two JSON files.
//!
//! ## Lifecycle
//!
//! `Pending -> InProgress -> Completed -> Archived`, or `Deleted` from any
//! non-terminal status. Only one task can be in progress at a time. Archived and
//! deleted tasks leave the active store and are appended to the archive file.
//!
//! ## Layout
//!
//! - [`store`]: the active task collection and ID allocator
//! - [`lifecycle`]: state transitions, selection and archival
//! - [`storage`]: the persistence port and its JSON/in-memory adapters
//! - [`report`]: active and archived report rows
//! - [`session`]: a loaded store bound to its repository and clock
//! - [`cmd`] and [`tui`]: the CLI subcommands and the interactive menu

pub mod cli;
pub mod clock;
pub mod cmd;
pub mod config;
pub mod error;
pub mod fields;
pub mod lifecycle;
pub mod report;
pub mod session;
pub mod storage;
pub mod store;
pub mod task;
pub mod validation;
pub mod tui {
    pub mod colors;
    pub mod enums;
    pub mod input;
    pub mod menu;
    pub mod task_form;
    pub mod utils;
}

pub use error::{StorageError, TaskError, TaskResult};
pub use fields::{Origin, Priority, Status};
pub use lifecycle::Lifecycle;
pub use session::Session;
pub use storage::{InMemoryRepository, JsonFileRepository, TaskRepository};
pub use store::TaskStore;
pub use task::{NewTask, Task};
pub use validation::{validate_origin, validate_priority, validate_status};
