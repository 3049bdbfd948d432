//! Execution Context
//!
//! Carries the principal, tracing IDs and the request clock through a use
//! case execution.

use chrono::{DateTime, Utc};
use crate::shared::tsid::TsidGenerator;

/// Context for a use case execution.
///
/// `initiated_at` is read once when the context is created. Every temporal
/// check of one execution ("is this meetup past?") compares against it, so a
/// request never sees two different "now" values.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique ID for this execution (generated)
    pub execution_id: String,
    /// ID for distributed tracing (usually from the request header)
    pub correlation_id: String,
    /// ID of the user performing the action
    pub principal_id: String,
    /// When the execution was initiated
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Create a context for a fresh request. The correlation ID starts as the
    /// execution ID.
    pub fn create(principal_id: impl Into<String>) -> Self {
        let exec_id = format!("exec-{}", TsidGenerator::generate());
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Create a context that continues an upstream correlation ID.
    pub fn with_correlation(
        principal_id: impl Into<String>,
        correlation_id: impl Into<String>,
    ) -> Self {
        Self {
            execution_id: format!("exec-{}", TsidGenerator::generate()),
            correlation_id: correlation_id.into(),
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Pin the clock of this execution.
    pub fn at(mut self, initiated_at: DateTime<Utc>) -> Self {
        self.initiated_at = initiated_at;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.initiated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_create_context() {
        let ctx = ExecutionContext::create("user-123");

        assert!(ctx.execution_id.starts_with("exec-"));
        assert_eq!(ctx.principal_id, "user-123");
        assert_eq!(ctx.correlation_id, ctx.execution_id);
    }

    #[test]
    fn test_with_correlation() {
        let ctx = ExecutionContext::with_correlation("user-123", "corr-456");

        assert!(ctx.execution_id.starts_with("exec-"));
        assert_eq!(ctx.correlation_id, "corr-456");
    }

    #[test]
    fn test_pinned_clock() {
        let at = Utc.with_ymd_and_hms(2025, 2, 1, 12, 0, 0).unwrap();
        let ctx = ExecutionContext::create("user-123").at(at);
        assert_eq!(ctx.now(), at);
    }
}
