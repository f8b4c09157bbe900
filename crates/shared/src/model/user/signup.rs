use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    api::error::ValidationError,
    model::{
        constants::{PASSWORD_MIN_LENGTH, USERNAME_MIN_LENGTH},
        ValidateModel,
    },
};

#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct SignupUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl SignupUser {
    pub fn new<U: Into<String>, E: Into<String>, P: Into<String>>(
        username: U,
        email: E,
        password: P,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }

    /// Strips surrounding whitespace from the username and email. The password
    /// is left as typed
    pub fn trimmed(self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
        }
    }
}

// Keep the password out of the logs
impl fmt::Debug for SignupUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl ValidateModel for SignupUser {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut error_messages = Vec::new();

        if self.username.trim().chars().count() < USERNAME_MIN_LENGTH {
            error_messages.push(format!(
                "Username needs to be at least {USERNAME_MIN_LENGTH} characters long"
            ));
        }

        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            error_messages.push("Email address is not valid".to_string());
        }

        if self.password.chars().count() < PASSWORD_MIN_LENGTH {
            error_messages.push(format!(
                "Password needs to be at least {PASSWORD_MIN_LENGTH} characters long"
            ));
        }

        if error_messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { error_messages })
        }
    }
}
