//! Authentication request types.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for login.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Login {
    /// Account number to log in as.
    pub number: i64,
    /// Account password.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}
