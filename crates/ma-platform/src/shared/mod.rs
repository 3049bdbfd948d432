//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod tsid;
pub mod middleware;
pub mod api_common;
pub mod schema;

pub use error::{PlatformError, Result};
pub use tsid::TsidGenerator;
pub use middleware::{Authenticated, AuthContext, AppState, AuthLayer};
pub use api_common::{PaginationParams, PaginatedResponse};
