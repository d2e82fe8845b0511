//! Typed token claims and validation outcomes.

use std::fmt;

use jiff::Timestamp;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};

/// Claims carried by an account token.
///
/// On the wire: `{"AccountNumber": <int>, "ExpiresAt": <unix seconds>}`.
/// Both claims are required. Integral floats such as `403138.0` are
/// accepted; strings, fractions and out-of-range numbers are not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Number of the account the token was issued for.
    #[serde(rename = "AccountNumber", deserialize_with = "whole_number")]
    pub account_number: i64,
    /// Expiration time as unix seconds.
    #[serde(rename = "ExpiresAt", deserialize_with = "whole_number")]
    pub expires_at: i64,
}

impl AuthClaims {
    /// Creates claims for `account_number` expiring at `expires_at`.
    pub fn new(account_number: i64, expires_at: Timestamp) -> Self {
        Self {
            account_number,
            expires_at: expires_at.as_second(),
        }
    }

    /// Returns whether the expiration time has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now().as_second()
    }
}

/// A token whose signature verified and whose claims decoded.
///
/// Structural soundness is not validity: check [`ParsedToken::is_valid`]
/// before trusting the claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedToken {
    claims: AuthClaims,
}

impl ParsedToken {
    pub(crate) fn new(claims: AuthClaims) -> Self {
        Self { claims }
    }

    /// Returns whether the token is still within its lifetime.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.claims.is_expired()
    }

    /// Returns the decoded claims.
    #[inline]
    pub fn claims(&self) -> &AuthClaims {
        &self.claims
    }
}

/// Why a token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not a well-formed compact JWS.
    #[error("malformed token")]
    MalformedToken,
    /// The algorithm is not HMAC or the signature does not verify.
    #[error("invalid token signature")]
    InvalidSignature,
    /// A claim is missing or has the wrong type.
    #[error("claim type mismatch: {0}")]
    ClaimTypeMismatch(String),
}

fn whole_number<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    struct WholeNumberVisitor;

    impl Visitor<'_> for WholeNumberVisitor {
        type Value = i64;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a whole number representable as i64")
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
            i64::try_from(value)
                .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
            // i64::MAX as f64 rounds up to 2^63, which is out of range.
            if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
                Ok(value as i64)
            } else {
                Err(E::invalid_value(de::Unexpected::Float(value), &self))
            }
        }
    }

    deserializer.deserialize_any(WholeNumberVisitor)
}
