//! Task creation form for the menu.
//!
//! Text fields take typed input; priority and origin are cycling selectors, so
//! only enumerated values can ever be submitted.

use crate::{
    error::TaskResult,
    fields::{Origin, Priority},
    task::NewTask,
    tui::input::InputField,
    validation::require_text,
};

pub const TITLE_FIELD: usize = 0;
pub const DESCRIPTION_FIELD: usize = 1;
pub const PRIORITY_FIELD: usize = 2;
pub const ORIGIN_FIELD: usize = 3;
pub const FIELD_COUNT: usize = 4;

/// Form state for a task being created.
#[derive(Clone, Debug, Default)]
pub struct TaskForm {
    pub title: InputField,
    pub description: InputField,
    pub priority: usize,
    pub origin: usize,
    pub current_field: usize,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_field(&mut self) {
        self.current_field = (self.current_field + 1) % FIELD_COUNT;
    }

    pub fn prev_field(&mut self) {
        self.current_field = (self.current_field + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    /// Text field under the cursor, if the current field takes typed input.
    pub fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            TITLE_FIELD => Some(&mut self.title),
            DESCRIPTION_FIELD => Some(&mut self.description),
            _ => None,
        }
    }

    /// Cycle the selector under the cursor forwards or backwards.
    pub fn cycle(&mut self, forward: bool) {
        let (slot, len) = match self.current_field {
            PRIORITY_FIELD => (&mut self.priority, Priority::ALL.len()),
            ORIGIN_FIELD => (&mut self.origin, Origin::ALL.len()),
            _ => return,
        };
        *slot = if forward { (*slot + 1) % len } else { (*slot + len - 1) % len };
    }

    pub fn selected_priority(&self) -> Priority {
        Priority::ALL[self.priority % Priority::ALL.len()]
    }

    pub fn selected_origin(&self) -> Origin {
        Origin::ALL[self.origin % Origin::ALL.len()]
    }

    /// Build the task request, failing when the title is blank.
    pub fn build(&self) -> TaskResult<NewTask> {
        let title = require_text("title", &self.title.value)?;
        Ok(NewTask::new(title, self.selected_priority(), self.selected_origin())
            .with_description(self.description.value.clone()))
    }
}
