//! Meetup Aggregate
//!
//! Meetups, their organizers, and the organizer-side management operations.

pub mod entity;
pub mod repository;
pub mod api;
pub mod operations;

pub use entity::{Meetup, MeetupWithOwner};
pub use repository::{MeetupStore, SqliteMeetupRepository};
pub use api::{MeetupsState, meetups_router};
