//! Use Case Errors
//!
//! Errors are categorized by type to enable consistent HTTP status mapping.
//!
//! ```ignore
//! UseCaseError::validation("TITLE_REQUIRED", "Title is required");
//!
//! UseCaseError::business_rule_with_details(
//!     "SCHEDULE_CONFLICT",
//!     "Can't subscribe to two meetups at the same time",
//!     details! { "meetupId" => meetup_id },
//! );
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Macro for creating error detail maps.
#[macro_export]
macro_rules! details {
    () => {
        std::collections::HashMap::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = std::collections::HashMap::new();
        $(
            map.insert($key.to_string(), serde_json::json!($value));
        )+
        map
    }};
}

/// Categorized error types for use case failures.
///
/// - `ValidationError` -> 400 Bad Request
/// - `ForbiddenError` -> 403 Forbidden
/// - `NotFoundError` -> 404 Not Found
/// - `BusinessRuleViolation` -> 409 Conflict
/// - `CommitError` -> 500 Internal Server Error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum UseCaseError {
    /// Input is malformed or refers to a state the request cannot apply to.
    ValidationError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// The principal may not act on this entity.
    ForbiddenError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// Entity not found.
    NotFoundError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// Constraint violated against existing state (duplicates, conflicts).
    BusinessRuleViolation {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },

    /// Reading or writing the store failed.
    CommitError {
        code: String,
        message: String,
        #[serde(default)]
        details: HashMap<String, serde_json::Value>,
    },
}

impl UseCaseError {
    pub fn validation(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn forbidden(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ForbiddenError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFoundError {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn business_rule(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BusinessRuleViolation {
            code: code.into(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn business_rule_with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self::BusinessRuleViolation {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    pub fn commit(message: impl Into<String>) -> Self {
        Self::CommitError {
            code: "COMMIT_FAILED".to_string(),
            message: message.into(),
            details: HashMap::new(),
        }
    }

    pub fn code(&self) -> &str {
        match self {
            Self::ValidationError { code, .. }
            | Self::ForbiddenError { code, .. }
            | Self::NotFoundError { code, .. }
            | Self::BusinessRuleViolation { code, .. }
            | Self::CommitError { code, .. } => code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::ValidationError { message, .. }
            | Self::ForbiddenError { message, .. }
            | Self::NotFoundError { message, .. }
            | Self::BusinessRuleViolation { message, .. }
            | Self::CommitError { message, .. } => message,
        }
    }

    pub fn details(&self) -> &HashMap<String, serde_json::Value> {
        match self {
            Self::ValidationError { details, .. }
            | Self::ForbiddenError { details, .. }
            | Self::NotFoundError { details, .. }
            | Self::BusinessRuleViolation { details, .. }
            | Self::CommitError { details, .. } => details,
        }
    }

    /// Get the suggested HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::ValidationError { .. } => 400,
            Self::ForbiddenError { .. } => 403,
            Self::NotFoundError { .. } => 404,
            Self::BusinessRuleViolation { .. } => 409,
            Self::CommitError { .. } => 500,
        }
    }

    /// True when this error is the given rejection.
    pub fn is(&self, rejection: super::Rejection) -> bool {
        self.code() == rejection.code()
    }
}

impl std::fmt::Display for UseCaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message())
    }
}

impl std::error::Error for UseCaseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(UseCaseError::validation("A", "a").http_status_code(), 400);
        assert_eq!(UseCaseError::forbidden("B", "b").http_status_code(), 403);
        assert_eq!(UseCaseError::not_found("C", "c").http_status_code(), 404);
        assert_eq!(UseCaseError::business_rule("D", "d").http_status_code(), 409);
        assert_eq!(UseCaseError::commit("e").http_status_code(), 500);
    }

    #[test]
    fn test_display() {
        let err = UseCaseError::validation("TITLE_REQUIRED", "Title is required");
        assert_eq!(err.to_string(), "[TITLE_REQUIRED] Title is required");
    }

    #[test]
    fn test_details_macro_with_error() {
        let meetup_id = "0HZXEQ5Y8JY5Z";
        let err = UseCaseError::business_rule_with_details(
            "SCHEDULE_CONFLICT",
            "conflict",
            details! { "meetupId" => meetup_id, "count" => 1 },
        );

        assert_eq!(err.details().get("meetupId"), Some(&serde_json::json!(meetup_id)));
        assert_eq!(err.details().get("count"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn test_details_macro_empty() {
        let details: HashMap<String, serde_json::Value> = details!();
        assert!(details.is_empty());
    }
}
