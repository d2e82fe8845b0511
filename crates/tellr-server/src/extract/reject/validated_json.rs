//! JSON extractor that also runs `validator` rules.

use std::borrow::Cow;
use std::collections::HashMap;

use axum::extract::{FromRequest, Request};
use derive_more::{Deref, DerefMut, From};
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors};

use super::Json;
use crate::handler::{Error, ErrorKind};

const TRACING_TARGET: &str = "tellr_server::extract::validate";

/// Deserializes a JSON body and validates it with [`Validate`].
///
/// Validation failures are 400s whose message names every failing field.
#[must_use]
#[derive(Debug, Clone, Copy, Default, Deref, DerefMut, From)]
pub struct ValidateJson<T>(pub T);

impl<T> ValidateJson<T> {
    /// Returns the inner validated value.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T, S> FromRequest<S> for ValidateJson<T>
where
    T: DeserializeOwned + Validate + 'static,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        data.validate()?;
        Ok(Self(data))
    }
}

/// Converts a Rust field name to its camelCase wire name.
fn wire_name(field: &str) -> String {
    let mut name = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !name.is_empty();
        } else if upper {
            name.extend(c.to_uppercase());
            upper = false;
        } else {
            name.push(c);
        }
    }

    name
}

fn param_u64(params: &HashMap<Cow<'static, str>, serde_json::Value>, key: &str) -> Option<u64> {
    params.get(key).and_then(serde_json::Value::as_u64)
}

fn format_length_error(field: &str, error: &ValidationError) -> String {
    match (
        param_u64(&error.params, "min"),
        param_u64(&error.params, "max"),
    ) {
        (Some(min), Some(max)) => {
            format!("field '{field}' must be between {min} and {max} characters long")
        }
        (Some(min), None) => format!("field '{field}' must be at least {min} characters long"),
        (None, Some(max)) => format!("field '{field}' must be at most {max} characters long"),
        (None, None) => format!("field '{field}' has invalid length"),
    }
}

fn format_validation_error(field: &str, error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return format!("field '{field}': {message}");
    }

    match error.code.as_ref() {
        "length" => format_length_error(field, error),
        "range" => format!("field '{field}' is out of range"),
        "required" => format!("field '{field}' is required"),
        "blank" => format!("field '{field}' must not be blank"),
        code => format!("field '{field}' failed validation: {code}"),
    }
}

impl From<ValidationErrors> for Error<'static> {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, field_errors)| {
                let field = wire_name(field);
                field_errors
                    .iter()
                    .map(move |error| format_validation_error(&field, error))
            })
            .collect();
        messages.sort();

        tracing::debug!(
            target: TRACING_TARGET,
            errors = ?errors.field_errors(),
            "request validation failed"
        );

        let message = match messages.as_slice() {
            [] => "validation failed".to_owned(),
            messages => messages.join("; "),
        };

        ErrorKind::BadRequest.with_message(message)
    }
}
