//! Organizing
//!
//! Read views over the meetups the caller organizes.

pub mod api;

pub use api::{OrganizingState, organizing_router};
