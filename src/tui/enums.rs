//! Enumerations for menu state management.

/// Screen currently shown by the menu.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuState {
    MainMenu,
    CreateTask,
    PickTask(TaskAction),
    PickPriority,
    ConfirmDelete,
    Report(ReportKind),
}

/// What happens to the task chosen from the task picker.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TaskAction {
    UpdatePriority,
    Delete,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ReportKind {
    Active,
    Archived,
}

/// Main menu entries in display order; entry `n` is bound to digit key `n + 1`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MenuItem {
    CreateTask,
    SelectNext,
    UpdatePriority,
    CompleteTask,
    ArchiveStale,
    DeleteTask,
    ActiveReport,
    ArchivedReport,
    Exit,
}

impl MenuItem {
    pub const ALL: [MenuItem; 9] = [
        MenuItem::CreateTask,
        MenuItem::SelectNext,
        MenuItem::UpdatePriority,
        MenuItem::CompleteTask,
        MenuItem::ArchiveStale,
        MenuItem::DeleteTask,
        MenuItem::ActiveReport,
        MenuItem::ArchivedReport,
        MenuItem::Exit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::CreateTask => "Create task",
            MenuItem::SelectNext => "Select next task",
            MenuItem::UpdatePriority => "Update priority",
            MenuItem::CompleteTask => "Complete task",
            MenuItem::ArchiveStale => "Archive old tasks",
            MenuItem::DeleteTask => "Delete task",
            MenuItem::ActiveReport => "Report",
            MenuItem::ArchivedReport => "Archived report",
            MenuItem::Exit => "Exit",
        }
    }

    /// Entry bound to a digit key, '1' through '9'.
    pub fn from_digit(c: char) -> Option<MenuItem> {
        let n = c.to_digit(10)? as usize;
        n.checked_sub(1).and_then(|i| MenuItem::ALL.get(i).copied())
    }
}
