//! Use Case Infrastructure
//!
//! - `UseCaseResult<T>` - sealed result type for use case outcomes
//! - `UseCaseError` - categorized error types for consistent handling
//! - `Rejection` - the expected, user-facing refusals of the meetup domain
//! - `ExecutionContext` - principal, tracing IDs and the request clock
//! - `EventMetadata` - common fields of the outcome events

pub mod result;
pub mod error;
pub mod rejection;
pub mod domain_event;
pub mod execution_context;

pub use result::UseCaseResult;
pub use error::UseCaseError;
pub use rejection::Rejection;
pub use domain_event::EventMetadata;
pub use execution_context::ExecutionContext;
