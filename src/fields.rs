//! Enumerations and field types for task tracking.
//!
//! This module defines the closed value sets a task can carry: its priority tier,
//! where the request came from, and where it sits in the lifecycle. Each type
//! parses from user text at the boundary so the rest of the crate never handles
//! raw strings.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::TaskError;

/// Priority tier used to rank pending tasks for selection.
///
/// Variants are declared from most to least urgent so the derived `Ord`
/// matches selection order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "Urgent")]
    Urgent,
    #[serde(alias = "High")]
    High,
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "Low")]
    Low,
}

impl Priority {
    /// All tiers, highest first.
    pub const ALL: [Priority; 4] = [Priority::Urgent, Priority::High, Priority::Medium, Priority::Low];

    pub fn label(self) -> &'static str {
        match self {
            Priority::Urgent => "Urgent",
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

/// Channel a task request arrived through.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Origin {
    #[serde(alias = "Email")]
    Email,
    #[serde(alias = "Phone")]
    Phone,
    #[serde(alias = "SystemTicket")]
    SystemTicket,
}

impl Origin {
    pub const ALL: [Origin; 3] = [Origin::Email, Origin::Phone, Origin::SystemTicket];

    pub fn label(self) -> &'static str {
        match self {
            Origin::Email => "Email",
            Origin::Phone => "Phone",
            Origin::SystemTicket => "System Ticket",
        }
    }
}

/// Lifecycle status of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "Pending")]
    Pending,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Completed")]
    Completed,
    #[serde(alias = "Archived")]
    Archived,
    #[serde(alias = "Deleted")]
    Deleted,
}

impl Status {
    pub const ALL: [Status; 5] = [
        Status::Pending,
        Status::InProgress,
        Status::Completed,
        Status::Archived,
        Status::Deleted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::InProgress => "In Progress",
            Status::Completed => "Completed",
            Status::Archived => "Archived",
            Status::Deleted => "Deleted",
        }
    }

    /// Archived and Deleted tasks never stay in the active store.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Archived | Status::Deleted)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    ///
    /// Movement is forward only: `Pending -> InProgress -> Completed -> Archived`,
    /// and any non-terminal status may be deleted.
    pub fn can_transition_to(self, next: Status) -> bool {
        match (self, next) {
            (Status::Pending, Status::InProgress) => true,
            (Status::InProgress, Status::Completed) => true,
            (Status::Completed, Status::Archived) => true,
            (from, Status::Deleted) => !from.is_terminal(),
            _ => false,
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lowercases and strips separators so "System Ticket", "system-ticket" and
/// "SystemTicket" all compare equal.
fn normalise(s: &str) -> String {
    s.trim()
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

impl FromStr for Priority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "urgent" => Ok(Priority::Urgent),
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(TaskError::validation(format!(
                "unknown priority '{}', expected one of: Urgent, High, Medium, Low",
                s.trim()
            ))),
        }
    }
}

impl FromStr for Origin {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "email" => Ok(Origin::Email),
            "phone" => Ok(Origin::Phone),
            "systemticket" => Ok(Origin::SystemTicket),
            _ => Err(TaskError::validation(format!(
                "unknown origin '{}', expected one of: Email, Phone, System Ticket",
                s.trim()
            ))),
        }
    }
}

impl FromStr for Status {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalise(s).as_str() {
            "pending" => Ok(Status::Pending),
            "inprogress" => Ok(Status::InProgress),
            "completed" => Ok(Status::Completed),
            "archived" => Ok(Status::Archived),
            "deleted" => Ok(Status::Deleted),
            _ => Err(TaskError::validation(format!("unknown status '{}'", s.trim()))),
        }
    }
}
