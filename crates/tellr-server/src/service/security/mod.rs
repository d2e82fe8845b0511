//! Token signing and password hashing.

mod auth_claims;
mod password_hasher;
mod session_keys;

pub use self::auth_claims::{AuthClaims, ParsedToken, TokenError};
pub use self::password_hasher::PasswordHasher;
pub use self::session_keys::{SessionKeys, SessionKeysConfig};
