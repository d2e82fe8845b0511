use crate::handler::{Error, ErrorKind};
use crate::service::StoreError;

impl From<StoreError> for Error<'static> {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound => ErrorKind::NotFound.with_message("account not found"),
            StoreError::Conflict => ErrorKind::Conflict
                .with_message("account number already taken")
                .with_context("unique constraint on account number"),
            StoreError::Storage(source) => {
                ErrorKind::InternalServerError.with_context(source.to_string())
            }
        }
    }
}
