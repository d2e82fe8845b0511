//! Request types for HTTP handlers.

mod accounts;
mod authentications;
mod transfers;

pub use accounts::*;
pub use authentications::*;
pub use transfers::*;
