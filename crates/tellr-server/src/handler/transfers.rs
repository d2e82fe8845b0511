//! Transfer handler.
//!
//! Transfers are accepted and echoed; balances never change.

use axum::Router;
use axum::routing::post;

use super::request::Transfer;
use crate::extract::Json;
use crate::service::ServiceState;

const TRACING_TARGET: &str = "tellr_server::handler::transfers";

#[tracing::instrument(skip_all)]
async fn transfer(Json(request): Json<Transfer>) -> Json<Transfer> {
    tracing::debug!(
        target: TRACING_TARGET,
        to_account = request.to_account,
        amount = request.amount,
        "transfer received"
    );

    Json(request)
}

/// Returns a [`Router`] with all transfer routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/transfer", post(transfer))
}
