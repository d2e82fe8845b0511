//! Bank account model.

use diesel::prelude::*;
use jiff_diesel::Timestamp;

use crate::schema::accounts;

/// A bank account row.
#[derive(Debug, Clone, PartialEq, Queryable, Selectable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Account {
    /// Server-assigned account identifier.
    pub id: i64,
    /// Holder's first name (1-50 characters).
    pub first_name: String,
    /// Holder's last name (1-50 characters).
    pub last_name: String,
    /// Externally facing account number, unique and never reused.
    pub number: i64,
    /// Argon2 PHC string of the account password.
    pub password_hash: String,
    /// Balance in minor units.
    pub balance: i64,
    /// Timestamp when the account was created.
    pub created_at: Timestamp,
    /// Timestamp when the account was soft-deleted.
    pub deleted_at: Option<Timestamp>,
}

impl Account {
    /// Returns whether the account has been soft-deleted.
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Data for creating a new account.
///
/// `balance` and `created_at` take their column defaults.
#[derive(Debug, Default, Clone, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NewAccount {
    /// Holder's first name.
    pub first_name: String,
    /// Holder's last name.
    pub last_name: String,
    /// Account number; must not collide with any existing row, deleted or not.
    pub number: i64,
    /// Argon2 PHC string of the account password.
    pub password_hash: String,
}
