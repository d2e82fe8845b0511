//! Transfer request types.

use serde::{Deserialize, Serialize};

/// Request payload for a transfer.
///
/// Decoded and echoed back; no balance is moved.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    /// Destination account number.
    pub to_account: i64,
    /// Amount in minor units.
    pub amount: i64,
}
