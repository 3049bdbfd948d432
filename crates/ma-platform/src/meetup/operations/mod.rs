//! Meetup Operations
//!
//! Organizer-side use cases: create, update and cancel a meetup.

pub mod events;
pub mod create;
pub mod update;
pub mod cancel;

pub use events::*;
pub use create::{CreateMeetupCommand, CreateMeetupUseCase};
pub use update::{UpdateMeetupCommand, UpdateMeetupUseCase};
pub use cancel::{CancelMeetupCommand, CancelMeetupUseCase};

use crate::usecase::UseCaseError;

/// Fails with `{FIELD}_REQUIRED` when `value` is blank.
pub(crate) fn require_text(field: &str, value: &str) -> Result<(), UseCaseError> {
    if value.trim().is_empty() {
        return Err(UseCaseError::validation(
            format!("{}_REQUIRED", field.to_uppercase()),
            format!("{} is required", capitalize(field)),
        ));
    }
    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text() {
        assert!(require_text("title", "Rust night").is_ok());

        let err = require_text("title", "   ").unwrap_err();
        assert_eq!(err.code(), "TITLE_REQUIRED");
        assert_eq!(err.message(), "Title is required");
        assert_eq!(err.http_status_code(), 400);
    }
}
