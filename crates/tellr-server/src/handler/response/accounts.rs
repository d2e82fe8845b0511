//! Account response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::service;

/// Represents an account.
///
/// The password hash never leaves the server.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Server-assigned identifier.
    pub id: i64,
    /// First name of the account holder.
    pub first_name: String,
    /// Last name of the account holder.
    pub last_name: String,
    /// Public account number.
    pub number: i64,
    /// Balance in minor units.
    pub balance: i64,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
}

impl Account {
    /// Builds the public view of a stored account, dropping the password hash.
    pub fn from_model(account: service::Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            created_at: account.created_at.into(),
        }
    }
}

/// Response to an account deletion.
#[must_use]
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DeletedAccount {
    /// Identifier of the deleted account.
    pub deleted: i64,
}
