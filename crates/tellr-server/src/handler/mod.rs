//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! | method | path            | access        |
//! |--------|-----------------|---------------|
//! | GET    | `/account`      | public        |
//! | POST   | `/account`      | public        |
//! | GET    | `/account/{id}` | account owner |
//! | DELETE | `/account/{id}` | account owner |
//! | POST   | `/login`        | public        |
//! | POST   | `/transfer`     | public        |
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod accounts;
mod authentication;
mod error;
mod request;
mod response;
mod transfers;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::request::{CreateAccount, Login, Transfer};
pub use crate::handler::response::{Account, DeletedAccount, LoginResponse};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes.
///
/// `state` is needed up front to build the ownership middleware; the router
/// still has to be given the same state with [`Router::with_state`].
pub fn routes(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .merge(accounts::routes(state))
        .merge(authentication::routes())
        .merge(transfers::routes())
        .fallback(handler)
}
