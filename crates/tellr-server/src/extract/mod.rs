//! Request extractors and response parts with uniform error handling.
//!
//! - [`Json`] and [`ValidateJson`] reject bad bodies with a 400 and a
//!   `{"error": reason}` body.
//! - [`Path`] rejects unparseable path parameters the same way.
//! - [`TokenHeader`] reads and writes the `x-jwt-token` header.

pub mod auth;
pub mod reject;

pub use crate::extract::auth::{AUTH_TOKEN_HEADER, TokenHeader};
pub use crate::extract::reject::{Json, Path, ValidateJson};
