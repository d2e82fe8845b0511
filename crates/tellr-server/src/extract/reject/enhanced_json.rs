//! JSON extractor and response with [`Error`] rejections.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json as AxumJson, Request};
use axum::response::{IntoResponse, Response};
use derive_more::{Deref, DerefMut, From};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::sanitize_error_message;
use crate::handler::{Error, ErrorKind};

/// JSON extractor whose rejections render as `{"error": reason}`.
///
/// Also usable as a response, where it behaves like [`axum::Json`].
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Creates a new [`Json`] wrapper around the provided value.
    #[inline]
    pub fn new(inner: T) -> Self {
        Self(inner)
    }

    /// Returns the inner value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let extractor = <AxumJson<T> as FromRequest<S>>::from_request(req, state).await;
        extractor.map(|x| Self::new(x.0)).map_err(Into::into)
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    #[inline]
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for Error<'static> {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonDataError(err) => ErrorKind::BadRequest.with_message(format!(
                "invalid request body: {}",
                sanitize_error_message(&err.body_text())
            )),
            JsonRejection::JsonSyntaxError(err) => ErrorKind::BadRequest.with_message(format!(
                "malformed JSON: {}",
                sanitize_error_message(&err.body_text())
            )),
            JsonRejection::MissingJsonContentType(_) => ErrorKind::BadRequest
                .with_message("expected request with `Content-Type: application/json`"),
            JsonRejection::BytesRejection(err) => ErrorKind::BadRequest
                .with_message("failed to read request body")
                .with_context(sanitize_error_message(&err.body_text())),
            rejection => ErrorKind::InternalServerError
                .with_context(format!("unexpected JSON rejection: {rejection:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::header::CONTENT_TYPE;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        amount: i64,
    }

    async fn extract(content_type: Option<&str>, body: &'static str) -> Result<Payload, Error<'static>> {
        let mut request = Request::builder().method("POST").uri("/");
        if let Some(content_type) = content_type {
            request = request.header(CONTENT_TYPE, content_type);
        }

        let request = request
            .body(Body::from(body))
            .map_err(|e| ErrorKind::InternalServerError.with_context(e.to_string()))?;
        let Json(payload) = Json::<Payload>::from_request(request, &()).await?;
        Ok(payload)
    }

    #[tokio::test]
    async fn rejections_are_bad_requests() {
        let syntax = extract(Some("application/json"), "{").await.err();
        assert_eq!(syntax.map(|e| e.kind()), Some(ErrorKind::BadRequest));

        let data = extract(Some("application/json"), r#"{"amount":"ten"}"#).await.err();
        assert_eq!(data.map(|e| e.kind()), Some(ErrorKind::BadRequest));

        let content_type = extract(None, r#"{"amount":10}"#).await.err();
        assert_eq!(content_type.map(|e| e.kind()), Some(ErrorKind::BadRequest));
    }

    #[tokio::test]
    async fn well_formed_body_is_extracted() -> anyhow::Result<()> {
        let payload = extract(Some("application/json"), r#"{"amount":10}"#).await?;
        assert_eq!(payload.amount, 10);
        Ok(())
    }
}
