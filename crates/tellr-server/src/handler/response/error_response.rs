use std::borrow::Cow;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// HTTP error response body.
///
/// Serializes as `{"error": message}`. The name, status and context are kept
/// for logging and never sent to the client.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse<'a> {
    /// Error name, used in logs.
    #[serde(skip)]
    pub name: Cow<'a, str>,
    /// Message safe for client display.
    #[serde(rename = "error")]
    pub message: Cow<'a, str>,
    /// Internal context for debugging.
    #[serde(skip)]
    pub context: Option<Cow<'a, str>>,
    /// HTTP status code.
    #[serde(skip)]
    pub status: StatusCode,
}

impl<'a> ErrorResponse<'a> {
    // 4xx Client Errors
    pub const BAD_REQUEST: Self = Self::new("bad_request", "bad request", StatusCode::BAD_REQUEST);
    pub const CONFLICT: Self = Self::new("conflict", "conflict", StatusCode::CONFLICT);
    pub const FORBIDDEN: Self = Self::new("forbidden", "permission denied", StatusCode::FORBIDDEN);
    pub const NOT_FOUND: Self = Self::new("not_found", "not found", StatusCode::NOT_FOUND);
    pub const REQUEST_TIMEOUT: Self = Self::new(
        "request_timeout",
        "request timeout",
        StatusCode::REQUEST_TIMEOUT,
    );
    pub const UNAUTHORIZED: Self = Self::new(
        "unauthorized",
        "invalid credentials",
        StatusCode::UNAUTHORIZED,
    );

    // 5xx Server Errors
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        "internal server error",
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a new error response.
    #[inline]
    pub const fn new(name: &'a str, message: &'a str, status: StatusCode) -> Self {
        Self {
            name: Cow::Borrowed(name),
            message: Cow::Borrowed(message),
            context: None,
            status,
        }
    }

    /// Replaces the client-facing message.
    pub fn with_message(mut self, message: impl Into<Cow<'a, str>>) -> Self {
        self.message = message.into();
        self
    }

    /// Attaches context, merging with any existing context.
    pub fn with_context(mut self, context: impl Into<Cow<'a, str>>) -> Self {
        let new_context = context.into();
        self.context = Some(match self.context {
            Some(existing) => Cow::Owned(format!("{}; {}", existing, new_context)),
            None => new_context,
        });
        self
    }
}

impl Default for ErrorResponse<'_> {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse<'_> {
    #[inline]
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_body_is_exact() -> anyhow::Result<()> {
        let json = serde_json::to_string(&ErrorResponse::FORBIDDEN)?;
        assert_eq!(json, r#"{"error":"permission denied"}"#);
        Ok(())
    }

    #[test]
    fn context_is_never_serialized() -> anyhow::Result<()> {
        let response = ErrorResponse::INTERNAL_SERVER_ERROR
            .with_context("connection refused")
            .with_context("pool exhausted");

        assert_eq!(
            response.context.as_deref(),
            Some("connection refused; pool exhausted")
        );

        let json = serde_json::to_string(&response)?;
        assert_eq!(json, r#"{"error":"internal server error"}"#);
        Ok(())
    }

    #[test]
    fn message_is_replaced() {
        let response = ErrorResponse::BAD_REQUEST.with_message("password is required");
        assert_eq!(response.message, "password is required");
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }
}
