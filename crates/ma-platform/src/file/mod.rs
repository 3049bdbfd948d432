//! File Aggregate
//!
//! Uploaded files, referenced by meetups as banners. Uploading itself is
//! handled outside the platform.

pub mod entity;
pub mod repository;

pub use entity::{File, FileView};
pub use repository::{FileStore, SqliteFileRepository};
