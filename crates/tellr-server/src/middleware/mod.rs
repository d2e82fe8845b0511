//! Middleware for `axum::Router` and HTTP request processing.
//!
//! ```rust,no_run
//! use axum::Router;
//! use tellr_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app: Router = Router::new()
//!     .with_default_recovery()
//!     .with_observability();
//! ```

mod authorization;
mod observability;
mod recovery;

pub use authorization::{AuthError, require_account_owner};
pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
