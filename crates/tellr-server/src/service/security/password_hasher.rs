//! Password hashing and verification with Argon2id.
//!
//! Both operations return handler errors, so login and signup handlers can
//! propagate them with `?`.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{Error as ArgonError, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier};

use crate::TRACING_TARGET_PASSWORD_HASHER;
use crate::handler::{ErrorKind, Result};

/// Argon2id password hashing with the library's default parameters.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
}

impl PasswordHasher {
    /// Creates a new [`PasswordHasher`].
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Hashes a password with a fresh random salt.
    ///
    /// Returns a PHC string carrying the algorithm, parameters and salt, ready
    /// to be stored as is.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InternalServerError`] if hashing fails.
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password hashing failed"
                );

                ErrorKind::InternalServerError.with_context("password hash generation failed")
            })?;

        Ok(password_hash.to_string())
    }

    /// Verifies a password against a stored PHC hash.
    ///
    /// # Errors
    ///
    /// - [`ErrorKind::Unauthorized`] when the password does not match.
    /// - [`ErrorKind::InternalServerError`] when the stored hash is unreadable.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> Result<()> {
        let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_PASSWORD_HASHER,
                error = %e,
                "stored password hash is not a valid PHC string"
            );

            ErrorKind::InternalServerError.with_context("invalid stored password hash")
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(()),
            Err(ArgonError::Password) => {
                tracing::debug!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    "password verification failed"
                );

                Err(ErrorKind::Unauthorized.with_context("password mismatch"))
            }
            Err(e) => {
                tracing::error!(
                    target: TRACING_TARGET_PASSWORD_HASHER,
                    error = %e,
                    "password verification error"
                );

                Err(ErrorKind::InternalServerError.with_context("password verification failed"))
            }
        }
    }

    /// Burns roughly the time of a real verification and always fails.
    ///
    /// Used when the account does not exist, so response timing does not
    /// reveal which account numbers are in use.
    pub fn verify_dummy_password(&self, password: &str) -> bool {
        use rand::Rng;
        use rand::distr::Alphanumeric;

        let password_len = rand::random_range(16..32);
        let dummy_password: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(password_len)
            .map(char::from)
            .collect();

        if let Ok(dummy_hash) = self.hash_password(&dummy_password) {
            let _ = self.verify_password(password, &dummy_hash);
        }

        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_password() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("hunter22")?;

        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify_password("hunter22", &hash).is_ok());
        Ok(())
    }

    #[test]
    fn hashes_are_salted() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let first = hasher.hash_password("same password")?;
        let second = hasher.hash_password("same password")?;

        assert_ne!(first, second);
        assert!(hasher.verify_password("same password", &second).is_ok());
        Ok(())
    }

    #[test]
    fn wrong_password_is_unauthorized() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash_password("correct")?;

        let error = hasher
            .verify_password("incorrect", &hash)
            .err()
            .ok_or_else(|| anyhow::anyhow!("wrong password verified"))?;
        assert_eq!(error.kind(), ErrorKind::Unauthorized);
        Ok(())
    }

    #[test]
    fn unreadable_hash_is_internal_error() -> anyhow::Result<()> {
        let hasher = PasswordHasher::new();
        let error = hasher
            .verify_password("password", "not a phc string")
            .err()
            .ok_or_else(|| anyhow::anyhow!("invalid hash verified"))?;
        assert_eq!(error.kind(), ErrorKind::InternalServerError);
        Ok(())
    }

    #[test]
    fn dummy_verification_always_fails() {
        assert!(!PasswordHasher::new().verify_dummy_password("anything"));
    }
}
