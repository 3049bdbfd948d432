//! Outcome Events
//!
//! Use cases answer with a past-tense event describing what happened
//! (`SubscriptionAdmitted`, `MeetupCancelled`). The events are returned to
//! the caller and logged; they are not stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ExecutionContext;
use crate::shared::tsid::TsidGenerator;

/// Common metadata for outcome events.
///
/// Event type format: `meetapp:{aggregate}:{action}`, e.g.
/// `meetapp:subscription:admitted`. Subject format: `{aggregate}.{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMetadata {
    pub event_id: String,
    pub event_type: String,
    pub subject: String,
    pub time: DateTime<Utc>,
    pub execution_id: String,
    pub correlation_id: String,
    pub principal_id: String,
}

impl EventMetadata {
    /// Stamp an event with the tracing fields of `ctx`. The event time is the
    /// execution clock.
    pub fn new(ctx: &ExecutionContext, event_type: &str, subject: String) -> Self {
        Self {
            event_id: TsidGenerator::generate(),
            event_type: event_type.to_string(),
            subject,
            time: ctx.initiated_at,
            execution_id: ctx.execution_id.clone(),
            correlation_id: ctx.correlation_id.clone(),
            principal_id: ctx.principal_id.clone(),
        }
    }
}
