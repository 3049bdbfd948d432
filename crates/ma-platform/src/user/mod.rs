//! User Aggregate
//!
//! Subscribers and organizers. Accounts are created by the external auth
//! service; the platform only reads them (and the development seeder writes
//! a few).

pub mod entity;
pub mod repository;

pub use entity::User;
pub use repository::{UserStore, SqliteUserRepository};
