use thiserror::Error;

use crate::model::StorageError;

pub type IdentityResult<T> = std::result::Result<T, IdentityError>;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("FieldRequired: {field}")]
    FieldRequired { field: &'static str },

    #[error("EmailTaken: {email}")]
    EmailTaken { email: String },

    #[error("InvalidCredentials")]
    InvalidCredentials,

    #[error("StorageError: {0}")]
    StorageError(#[from] StorageError),
}

impl IdentityError {
    pub fn field_required(field: &'static str) -> Self {
        Self::FieldRequired { field }
    }

    pub fn email_taken<S: Into<String>>(email: S) -> Self {
        Self::EmailTaken {
            email: email.into(),
        }
    }

    /// Message fit for showing to the user next to the form.
    pub fn client_display(&self) -> String {
        match self {
            Self::FieldRequired { field } => {
                let mut chars = field.chars();
                match chars.next() {
                    Some(first) => format!("{}{} is required", first.to_uppercase(), chars.as_str()),
                    None => String::from("A required field is missing"),
                }
            }
            Self::EmailTaken { .. } => {
                String::from("Registration error, an account with this email already exists.")
            }
            Self::InvalidCredentials => {
                String::from("Login error, user not found or password is invalid.")
            }
            Self::StorageError(_) => String::from("Internal storage error."),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn client_display_capitalizes_field() {
        assert_eq!(
            IdentityError::field_required("name").client_display(),
            "Name is required"
        );
    }
}
