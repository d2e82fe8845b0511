//! Login handler.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::routing::post;

use super::request::Login;
use super::response::LoginResponse;
use crate::extract::{Json, ValidateJson};
use crate::handler::{ErrorKind, Result};
use crate::service::{AccountStore, PasswordHasher, ServiceState, SessionKeys, StoreError};

/// Tracing target for authentication operations.
const TRACING_TARGET: &str = "tellr_server::handler::authentication";

/// Exchanges an account number and password for a token.
///
/// Unknown numbers and wrong passwords get the same 401. For unknown numbers
/// a dummy verification still runs, so timing does not reveal which numbers
/// exist.
#[tracing::instrument(skip_all)]
async fn login(
    State(accounts): State<Arc<dyn AccountStore>>,
    State(password_hasher): State<PasswordHasher>,
    State(session_keys): State<SessionKeys>,
    ValidateJson(request): ValidateJson<Login>,
) -> Result<Json<LoginResponse>> {
    let account = match accounts.find_account_by_number(request.number).await {
        Ok(account) => account,
        Err(StoreError::NotFound) => {
            password_hasher.verify_dummy_password(&request.password);

            tracing::warn!(
                target: TRACING_TARGET,
                number = request.number,
                "login failed: unknown account number"
            );

            return Err(ErrorKind::Unauthorized.with_context("unknown account number"));
        }
        Err(error) => return Err(error.into()),
    };

    if let Err(error) = password_hasher.verify_password(&request.password, &account.password_hash)
    {
        tracing::warn!(
            target: TRACING_TARGET,
            number = account.number,
            "login failed: password mismatch"
        );

        return Err(error);
    }

    let token = session_keys.issue_token(account.number)?;

    tracing::info!(
        target: TRACING_TARGET,
        account_id = account.id,
        number = account.number,
        "login successful"
    );

    Ok(Json(LoginResponse {
        number: account.number,
        token,
    }))
}

/// Returns a [`Router`] with all authentication routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/login", post(login))
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    use crate::handler::test::create_test_server;

    async fn signup(server: &axum_test::TestServer) -> anyhow::Result<i64> {
        let response = server
            .post("/account")
            .json(&json!({"firstName": "Ada", "lastName": "Lovelace", "password": "hunter22"}))
            .await;
        response.assert_status_ok();

        response.json::<Value>()["number"]
            .as_i64()
            .ok_or_else(|| anyhow::anyhow!("number is not an integer"))
    }

    #[tokio::test]
    async fn login_success() -> anyhow::Result<()> {
        let (server, state) = create_test_server().await?;
        let number = signup(&server).await?;

        let response = server
            .post("/login")
            .json(&json!({"number": number, "password": "hunter22"}))
            .await;
        response.assert_status_ok();

        let body = response.json::<Value>();
        assert_eq!(body["number"], number);

        let token = body["token"]
            .as_str()
            .ok_or_else(|| anyhow::anyhow!("token is not a string"))?;
        let parsed = state.session_keys.validate_token(token)?;
        assert_eq!(parsed.claims().account_number, number);
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;
        let number = signup(&server).await?;

        let response = server
            .post("/login")
            .json(&json!({"number": number, "password": "wrong"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({"error": "invalid credentials"}));
        Ok(())
    }

    #[tokio::test]
    async fn unknown_number_is_unauthorized() -> anyhow::Result<()> {
        let (server, _) = create_test_server().await?;

        let response = server
            .post("/login")
            .json(&json!({"number": 42, "password": "hunter22"}))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({"error": "invalid credentials"}));
        Ok(())
    }
}
