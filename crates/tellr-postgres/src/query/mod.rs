//! Repository traits implemented on [`PgConnection`].
//!
//! [`PgConnection`]: crate::PgConnection

pub mod account;

pub use account::{ACCOUNT_NUMBER_CONSTRAINT, AccountRepository};
