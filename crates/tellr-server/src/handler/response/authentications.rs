//! Authentication response types.

use serde::{Deserialize, Serialize};

/// Response to a successful login.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Account number the token was issued for.
    pub number: i64,
    /// Signed account token, to be sent back in `x-jwt-token`.
    pub token: String,
}
