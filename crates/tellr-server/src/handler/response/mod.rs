//! Response types for HTTP handlers.

mod accounts;
mod authentications;
mod error_response;

pub use accounts::*;
pub use authentications::*;
pub use error_response::ErrorResponse;
