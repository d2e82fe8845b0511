//! Symmetric keys for issuing and validating account tokens.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "config")]
use clap::Args;
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::errors::{Error as JwtError, ErrorKind as JwtErrorKind};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::{AuthClaims, ParsedToken, TokenError};
use crate::{Error, Result, TRACING_TARGET_AUTHENTICATION, TRACING_TARGET_SESSION_KEYS};

/// Default token lifetime in seconds.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 900;

/// Algorithms accepted when validating a token.
const ACCEPTED_ALGORITHMS: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

/// Token signing configuration.
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct SessionKeysConfig {
    /// Shared HMAC secret used to sign and verify tokens.
    #[cfg_attr(
        feature = "config",
        arg(long = "jwt-secret", env = "JWT_SECRET", hide_env_values = true)
    )]
    #[serde(skip_serializing)]
    pub jwt_secret: String,

    /// Lifetime of issued tokens in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long = "jwt-ttl-secs",
            env = "JWT_TTL_SECS",
            default_value_t = DEFAULT_TOKEN_TTL_SECS
        )
    )]
    #[serde(default = "default_token_ttl_secs")]
    pub jwt_ttl_secs: u64,
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl SessionKeysConfig {
    /// Creates a configuration with the default token lifetime.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            jwt_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Sets the token lifetime in seconds.
    pub fn with_ttl_secs(mut self, secs: u64) -> Self {
        self.jwt_ttl_secs = secs;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            return Err(Error::config("jwt secret cannot be empty"));
        }

        if self.jwt_ttl_secs == 0 || i64::try_from(self.jwt_ttl_secs).is_err() {
            return Err(Error::config("jwt ttl must be a positive number of seconds"));
        }

        Ok(())
    }
}

impl fmt::Debug for SessionKeysConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeysConfig")
            .field("jwt_secret", &"***")
            .field("jwt_ttl_secs", &self.jwt_ttl_secs)
            .finish()
    }
}

/// Keys for signing and verifying account tokens.
///
/// Built once at startup from [`SessionKeysConfig`] and shared through
/// [`ServiceState`]. Cheap to clone.
///
/// [`ServiceState`]: crate::service::ServiceState
#[derive(Clone)]
pub struct SessionKeys {
    inner: Arc<SessionKeysInner>,
}

struct SessionKeysInner {
    decoding_key: DecodingKey,
    encoding_key: EncodingKey,
    validation: Validation,
    token_ttl: SignedDuration,
}

impl SessionKeys {
    /// Creates session keys from the provided configuration.
    pub fn from_config(config: &SessionKeysConfig) -> Result<Self> {
        config.validate()?;

        let secret = config.jwt_secret.as_bytes();
        let token_ttl = SignedDuration::from_secs(config.jwt_ttl_secs as i64);

        // ExpiresAt is not the registered `exp` claim, so expiry is checked
        // by `ParsedToken::is_valid` instead of the library.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.algorithms = ACCEPTED_ALGORITHMS.to_vec();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        tracing::info!(
            target: TRACING_TARGET_SESSION_KEYS,
            token_ttl_secs = config.jwt_ttl_secs,
            "session keys loaded"
        );

        let inner = SessionKeysInner {
            decoding_key: DecodingKey::from_secret(secret),
            encoding_key: EncodingKey::from_secret(secret),
            validation,
            token_ttl,
        };

        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Creates session keys from a secret with the default token lifetime.
    pub fn from_secret(secret: impl Into<String>) -> Result<Self> {
        Self::from_config(&SessionKeysConfig::new(secret))
    }

    /// Returns the lifetime of issued tokens.
    #[inline]
    pub fn token_ttl(&self) -> SignedDuration {
        self.inner.token_ttl
    }

    /// Signs a token for `account_number` with HS256.
    pub fn issue_token(&self, account_number: i64) -> Result<String> {
        let claims = AuthClaims::new(account_number, Timestamp::now() + self.inner.token_ttl);
        self.sign_claims(&claims)
    }

    /// Signs arbitrary claims with HS256.
    pub fn sign_claims(&self, claims: &AuthClaims) -> Result<String> {
        let header = Header::new(Algorithm::HS256);
        jsonwebtoken::encode(&header, claims, &self.inner.encoding_key).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_SESSION_KEYS,
                error = %e,
                "failed to sign token"
            );

            Error::auth("failed to sign token").with_source(e)
        })
    }

    /// Verifies a token's signature and decodes its claims.
    ///
    /// A returned [`ParsedToken`] may still be expired; callers must check
    /// [`ParsedToken::is_valid`].
    pub fn validate_token(&self, token: &str) -> Result<ParsedToken, TokenError> {
        // Parse the header on its own so that a broken header is reported as
        // malformed rather than as a claim problem.
        jsonwebtoken::decode_header(token).map_err(|e| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                "token header could not be parsed"
            );
            TokenError::MalformedToken
        })?;

        let token_data = jsonwebtoken::decode::<serde_json::Map<String, serde_json::Value>>(
            token,
            &self.inner.decoding_key,
            &self.inner.validation,
        )
        .map_err(token_error)?;

        let payload = serde_json::Value::Object(token_data.claims);
        let claims: AuthClaims = serde_json::from_value(payload).map_err(|e| {
            tracing::debug!(
                target: TRACING_TARGET_AUTHENTICATION,
                error = %e,
                "token claims have unexpected types"
            );
            TokenError::ClaimTypeMismatch(e.to_string())
        })?;

        Ok(ParsedToken::new(claims))
    }
}

fn token_error(error: JwtError) -> TokenError {
    let token_error = match error.kind() {
        JwtErrorKind::InvalidSignature
        | JwtErrorKind::InvalidAlgorithm
        | JwtErrorKind::InvalidAlgorithmName => TokenError::InvalidSignature,
        _ => TokenError::MalformedToken,
    };

    tracing::debug!(
        target: TRACING_TARGET_AUTHENTICATION,
        error = %error,
        reason = %token_error,
        "token rejected"
    );

    token_error
}

impl fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeys")
            .field("token_ttl", &self.inner.token_ttl)
            .finish_non_exhaustive()
    }
}
