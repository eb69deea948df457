//! Command implementations for the CLI interface.
//!
//! Each handler opens a session on the configured data directory, runs one
//! lifecycle operation, saves the active set and prints the outcome. The
//! interactive menu is launched from here as well.

use clap::Subcommand;
use clap_complete::{generate, Shell};
use mockable::DefaultClock;

use crate::config::{Config, MAX_ARCHIVE_AFTER_DAYS};
use crate::error::TaskError;
use crate::fields::{Origin, Priority};
use crate::report::print_table;
use crate::session::Session;
use crate::storage::JsonFileRepository;
use crate::task::NewTask;
use crate::tui::menu::run_menu;

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive menu.
    Menu,

    /// Add a new pending task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Priority: urgent | high | medium | low.
        #[arg(long, value_enum)]
        priority: Priority,
        /// Origin: email | phone | system-ticket.
        #[arg(long, value_enum)]
        origin: Origin,
    },

    /// Start the highest-priority pending task.
    Next,

    /// Change the priority of a task.
    Priority {
        /// Task ID.
        id: u64,
        /// New priority: urgent | high | medium | low.
        #[arg(value_enum)]
        priority: Priority,
    },

    /// Complete the task in progress.
    Complete,

    /// Archive tasks completed more than N days ago.
    Archive {
        /// Age threshold in days (default 7, at most 36500).
        #[arg(long, value_parser = clap::value_parser!(i64).range(0..=MAX_ARCHIVE_AFTER_DAYS))]
        days: Option<i64>,
    },

    /// Delete a task, keeping a snapshot in the archive.
    Delete {
        /// Task ID.
        id: u64,
    },

    /// Report on active tasks.
    Report {
        /// Print one pipe-separated line per task instead of a table.
        #[arg(long)]
        plain: bool,
    },

    /// Report on archived tasks.
    Archived {
        /// Print one pipe-separated line per task instead of a table.
        #[arg(long)]
        plain: bool,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

type CliSession = Session<JsonFileRepository, DefaultClock>;

/// Open a session on the configured data directory.
fn open_session(config: &Config) -> CliSession {
    Session::open(config.open_repository(), DefaultClock).with_archive_threshold(config.archive_threshold())
}

/// Persist the active set, exiting on failure.
fn save(session: &CliSession) {
    if let Err(e) = session.save() {
        eprintln!("Failed to save tasks: {e}");
        std::process::exit(1);
    }
}

/// Print a failed operation. Informational outcomes are not errors.
fn fail(e: TaskError) {
    if e.is_informational() {
        println!("{e}");
    } else {
        eprintln!("{e}");
        std::process::exit(1);
    }
}

/// Add a new task.
pub fn cmd_add(config: &Config, title: String, desc: Option<String>, priority: Priority, origin: Origin) {
    let mut session = open_session(config);
    let mut new = NewTask::new(title, priority, origin);
    if let Some(desc) = desc {
        new = new.with_description(desc);
    }
    match session.engine().create(new) {
        Ok(task) => {
            save(&session);
            println!("Added task {}", task.id);
        }
        Err(e) => fail(e),
    }
}

/// Select the next task to work on.
pub fn cmd_next(config: &Config) {
    let mut session = open_session(config);
    match session.engine().select_next() {
        Ok(task) => {
            save(&session);
            println!("Selected for execution:");
            println!("ID: {} | Title: {} | Priority: {} | Status: {}", task.id, task.title, task.priority, task.status);
        }
        Err(e) => fail(e),
    }
}

/// Update a task's priority.
pub fn cmd_priority(config: &Config, id: u64, priority: Priority) {
    let mut session = open_session(config);
    match session.engine().update_priority(id, priority) {
        Ok(task) => {
            save(&session);
            println!("Task {} priority set to {}", task.id, task.priority);
        }
        Err(e) => fail(e),
    }
}

/// Complete the in-progress task.
pub fn cmd_complete(config: &Config) {
    let mut session = open_session(config);
    match session.engine().complete() {
        Ok(task) => {
            save(&session);
            println!("Task '{}' completed.", task.title);
        }
        Err(e) => fail(e),
    }
}

/// Archive stale completed tasks.
pub fn cmd_archive(config: &Config, days: Option<i64>) {
    let mut config = config.clone();
    if let Some(days) = days {
        config.archive_after_days = days;
    }
    let mut session = open_session(&config);
    let result = session.archive_stale();
    // Tasks archived before a failure are already gone from the store.
    save(&session);
    match result {
        Ok(0) => println!("No tasks to archive."),
        Ok(n) => println!("{n} task(s) archived."),
        Err(e) => fail(e),
    }
}

/// Delete a task by ID.
pub fn cmd_delete(config: &Config, id: u64) {
    let mut session = open_session(config);
    match session.engine().delete_task(id) {
        Ok(task) => {
            save(&session);
            println!("Deleted task {} '{}'.", task.id, task.title);
        }
        Err(e) => fail(e),
    }
}

/// Report on active tasks.
pub fn cmd_report(config: &Config, plain: bool) {
    let session = open_session(config);
    let rows = session.active_rows();
    if rows.is_empty() {
        println!("No tasks.");
        return;
    }
    if plain {
        rows.iter().for_each(|r| println!("{r}"));
    } else {
        print_table(&rows);
    }
}

/// Report on archived tasks.
pub fn cmd_archived(config: &Config, plain: bool) {
    let session = open_session(config);
    match session.archived_rows() {
        Ok(rows) if rows.is_empty() => println!("No archived tasks."),
        Ok(rows) if plain => rows.iter().for_each(|r| println!("{r}")),
        Ok(rows) => print_table(&rows),
        Err(e) => {
            eprintln!("Error loading archived tasks: {e}");
            std::process::exit(1);
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Launch the interactive menu; the active set is saved on exit.
pub fn cmd_menu(config: &Config) {
    let mut session = open_session(config);
    let res = run_menu(&mut session);
    save(&session);
    if let Err(err) = res {
        eprintln!("Menu error: {err}");
        std::process::exit(1);
    }
}
