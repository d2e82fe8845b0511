use crate::handler::{Error, ErrorKind};

impl From<crate::Error> for Error<'static> {
    fn from(error: crate::Error) -> Self {
        ErrorKind::InternalServerError.with_context(error.to_string())
    }
}
