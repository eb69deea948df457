//! Read-only report projections over active and archived tasks.

use std::fmt;

use chrono::{DateTime, Duration, Local, Utc};

use crate::error::TaskResult;
use crate::fields::{Origin, Priority, Status};
use crate::storage::TaskRepository;
use crate::store::TaskStore;
use crate::task::Task;

/// One formatted line of a task report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub origin: Origin,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Present only for completed tasks that carry a completion time.
    pub execution_time: Option<Duration>,
}

impl From<&Task> for ReportRow {
    fn from(t: &Task) -> Self {
        ReportRow {
            id: t.id,
            title: t.title.clone(),
            description: t.description.clone().unwrap_or_default(),
            priority: t.priority,
            status: t.status,
            origin: t.origin,
            created_at: t.created_at,
            completed_at: t.completed_at,
            execution_time: t.execution_time(),
        }
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {} | Title: {} | Description: {} | Priority: {} | Status: {} | Origin: {} | Created: {}",
            self.id,
            self.title,
            if self.description.is_empty() { "-" } else { self.description.as_str() },
            self.priority,
            self.status,
            self.origin,
            format_timestamp(self.created_at),
        )?;
        if let Some(completed) = self.completed_at {
            write!(f, " | Completed: {}", format_timestamp(completed))?;
        }
        if let Some(elapsed) = self.execution_time {
            write!(f, " | Execution time: {}", format_duration(elapsed))?;
        }
        Ok(())
    }
}

/// Rows for every active task, in store order.
pub fn active_report(store: &TaskStore) -> impl Iterator<Item = ReportRow> + '_ {
    store.all().iter().map(ReportRow::from)
}

/// Rows for archived tasks, re-read from the archive on every call.
///
/// Deleted snapshots share the archive but are left out.
pub fn archived_report(repo: &impl TaskRepository) -> TaskResult<Vec<ReportRow>> {
    Ok(repo
        .load_archive()?
        .iter()
        .filter(|t| t.status == Status::Archived)
        .map(ReportRow::from)
        .collect())
}

/// Format a UTC timestamp in local time as `dd/mm/yyyy HH:MM`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string()
}

/// Format a duration compactly, e.g. "2d 3h 15m", "4h 0m" or "45s".
pub fn format_duration(d: Duration) -> String {
    let secs = d.num_seconds().max(0);
    let (days, hours, mins) = (secs / 86_400, (secs % 86_400) / 3_600, (secs % 3_600) / 60);
    if days > 0 {
        format!("{days}d {hours}h {mins}m")
    } else if hours > 0 {
        format!("{hours}h {mins}m")
    } else if mins > 0 {
        format!("{mins}m")
    } else {
        format!("{secs}s")
    }
}

/// Print rows in a formatted table.
pub fn print_table(rows: &[ReportRow]) {
    println!(
        "{:<5} {:<8} {:<12} {:<14} {:<17} {:<10} {}",
        "ID", "Pri", "Status", "Origin", "Created", "Took", "Title"
    );
    for r in rows {
        let took = r.execution_time.map(format_duration).unwrap_or_else(|| "-".into());
        println!(
            "{:<5} {:<8} {:<12} {:<14} {:<17} {:<10} {}",
            r.id,
            r.priority.label(),
            r.status.label(),
            r.origin.label(),
            format_timestamp(r.created_at),
            took,
            truncate(&r.title, 60)
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
