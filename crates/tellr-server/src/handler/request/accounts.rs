//! Account request types.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Request payload to open a new account.
#[must_use]
#[derive(Debug, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccount {
    /// First name of the account holder (1-50 characters, not blank).
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub first_name: String,
    /// Last name of the account holder (1-50 characters, not blank).
    #[validate(length(min = 1, max = 50), custom(function = "not_blank"))]
    pub last_name: String,
    /// Plaintext password, hashed before storage.
    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// Rejects names made only of whitespace; stores keep names trimmed.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(first_name: &str) -> CreateAccount {
        CreateAccount {
            first_name: first_name.to_owned(),
            last_name: "Lovelace".to_owned(),
            password: "hunter22".to_owned(),
        }
    }

    #[test]
    fn name_length_bounds() {
        assert!(request("A").validate().is_ok());
        assert!(request(&"a".repeat(50)).validate().is_ok());
        assert!(request("").validate().is_err());
        assert!(request(&"a".repeat(51)).validate().is_err());
    }

    #[test]
    fn blank_names_are_rejected() {
        assert!(request("   ").validate().is_err());
        assert!(request("\t\n").validate().is_err());
        assert!(request(" Ada ").validate().is_ok());
    }

    #[test]
    fn camel_case_wire_names() -> anyhow::Result<()> {
        let request: CreateAccount = serde_json::from_str(
            r#"{"firstName":"Ada","lastName":"Lovelace","password":"hunter22"}"#,
        )?;
        assert_eq!(request.first_name, "Ada");
        assert_eq!(request.last_name, "Lovelace");
        Ok(())
    }
}
