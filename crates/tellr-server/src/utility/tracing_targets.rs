//! Tracing target constants for structured logging.
//!
//! Every log line in this crate uses one of these targets, so output can be
//! filtered per concern with `RUST_LOG`, e.g.
//! `RUST_LOG=tellr_server::authorization=debug`.

/// Token validation and issuing.
pub const TRACING_TARGET_AUTHENTICATION: &str = "tellr_server::authentication";

/// Account ownership checks on protected routes.
pub const TRACING_TARGET_AUTHORIZATION: &str = "tellr_server::authorization";

/// Middleware errors and request timeouts.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "tellr_server::recovery::error";

/// Handler panics.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "tellr_server::recovery::panic";

/// Password hashing and verification.
pub const TRACING_TARGET_PASSWORD_HASHER: &str = "tellr_server::password_hasher";

/// Session key loading and token signing.
pub const TRACING_TARGET_SESSION_KEYS: &str = "tellr_server::session_keys";

/// Account store operations.
pub const TRACING_TARGET_ACCOUNT_STORE: &str = "tellr_server::account_store";
