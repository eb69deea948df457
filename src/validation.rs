//! Checks for user-supplied task values.
//!
//! `validate_priority`, `validate_origin` and `validate_status` are the public
//! predicate API for callers holding raw text, such as scripts that build task
//! files by hand. They agree with the `FromStr` impls in [`crate::fields`],
//! which the CLI and menu parse through directly. `require_text` and
//! `optional_text` are applied by [`crate::store::TaskStore::create`].

use crate::error::{TaskError, TaskResult};
use crate::fields::{Origin, Priority, Status};

/// True when `s` names a priority tier.
pub fn validate_priority(s: &str) -> bool {
    s.parse::<Priority>().is_ok()
}

/// True when `s` names a task origin.
pub fn validate_origin(s: &str) -> bool {
    s.parse::<Origin>().is_ok()
}

/// True when `s` names a lifecycle status.
pub fn validate_status(s: &str) -> bool {
    s.parse::<Status>().is_ok()
}

/// Trim a required text field, rejecting it when nothing is left.
pub fn require_text(field: &str, value: &str) -> TaskResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(TaskError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional text field, mapping blank input to `None`.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_predicates() {
        assert!(validate_priority("High"));
        assert!(!validate_priority("Highest"));
        assert!(validate_origin("Phone"));
        assert!(!validate_origin("Fax"));
        assert!(validate_status("Deleted"));
        assert!(!validate_status(""));
    }

    #[test]
    fn test_predicates_accept_every_label() {
        for p in Priority::ALL {
            assert!(validate_priority(p.label()));
        }
        for o in Origin::ALL {
            assert!(validate_origin(o.label()));
        }
        for s in Status::ALL {
            assert!(validate_status(s.label()));
        }
        assert!(validate_origin("system-ticket"));
        assert!(validate_status("in-progress"));
    }

    #[test]
    fn test_require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("title", "  Fix printer ").unwrap(), "Fix printer");
        assert!(matches!(require_text("title", "   "), Err(TaskError::Validation(_))));
    }

    #[test]
    fn test_optional_text_maps_blank_to_none() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(None), None);
        assert_eq!(optional_text(Some(" call back ")), Some("call back".to_string()));
    }
}
