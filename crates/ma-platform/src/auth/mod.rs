//! Authentication
//!
//! Sessions are issued elsewhere; this service only verifies the HS256
//! tokens they carry and reads the user id from `sub`.

pub mod token_service;

pub use token_service::{TokenService, TokenClaims, extract_bearer_token};
