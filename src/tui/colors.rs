//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{Priority, Status};

// Native Color::Red is used for Urgent and Color::Gray for Low

/// Used for High priority
pub const ORANGE: Color = Color::Rgb(255, 140, 0);
/// Used for Medium priority
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Used for tasks in progress
pub const DARK_GREEN: Color = Color::Rgb(0, 120, 0);

/// Color a task row by its priority tier.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::Urgent => Color::Red,
        Priority::High => ORANGE,
        Priority::Medium => GOLD,
        Priority::Low => Color::Gray,
    }
}

pub fn status_color(s: Status) -> Color {
    match s {
        Status::Pending => Color::White,
        Status::InProgress => DARK_GREEN,
        Status::Completed => Color::Cyan,
        Status::Archived | Status::Deleted => Color::DarkGray,
    }
}
