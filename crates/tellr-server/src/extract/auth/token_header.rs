use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponseParts, ResponseParts};

use crate::handler::{Error, ErrorKind};

/// Header carrying the account token, on requests and on signup responses.
pub const AUTH_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-jwt-token");

/// A raw account token taken from, or written to, [`AUTH_TOKEN_HEADER`].
///
/// Holds the token text only; validation is up to [`SessionKeys`].
///
/// [`SessionKeys`]: crate::service::SessionKeys
#[derive(Clone, PartialEq, Eq)]
pub struct TokenHeader(String);

impl TokenHeader {
    /// Wraps an issued token.
    #[inline]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Reads the token from request headers.
    ///
    /// Returns `None` when the header is absent, empty or not visible ASCII.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(AUTH_TOKEN_HEADER)?.to_str().ok()?;
        let token = value.trim();
        (!token.is_empty()).then(|| Self::new(token))
    }

    /// Returns the token text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for TokenHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TokenHeader(***)")
    }
}

impl IntoResponseParts for TokenHeader {
    type Error = Error<'static>;

    fn into_response_parts(self, mut res: ResponseParts) -> Result<ResponseParts, Self::Error> {
        let value = HeaderValue::from_str(&self.0).map_err(|e| {
            ErrorKind::InternalServerError.with_context(format!("invalid token header: {e}"))
        })?;

        res.headers_mut().insert(AUTH_TOKEN_HEADER, value);
        Ok(res)
    }
}
