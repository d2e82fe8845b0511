//! The `x-jwt-token` header.

mod token_header;

pub use self::token_header::{AUTH_TOKEN_HEADER, TokenHeader};
