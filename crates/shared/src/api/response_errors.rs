use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::error::ServerError;

macro_rules! response_error {
    ($name:ident {
        $(
            #[code($variant_code:expr)]
            #[message($message:tt)]
            $variant:ident
            $({ $($var_struct_body_tt:tt)* })?
        ,)*
    }) => {

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
        pub enum $name {
            $(
                #[error($message)]
                $variant $({
                    $($var_struct_body_tt)*
                })?,
            )*
        }

        impl $name {
            pub fn code(&self) -> StatusCode {
                match self {
                    $( $name::$variant { .. } => $variant_code, )*
                }
            }
        }

        impl From<$name> for ServerError<$name> {
            fn from(inner: $name) -> Self {
                let code = inner.code();
                Self::Inner { code, inner }
            }
        }
    };
}

response_error!(SignupError {
    #[code(StatusCode::CONFLICT)]
    #[message("Username is already registered")]
    UsernameUnavailable,
    #[code(StatusCode::CONFLICT)]
    #[message("Email is already registered")]
    EmailUnavailable,
});

response_error!(LoginError {
    // Unknown usernames and wrong passwords share a message so the response
    // doesn't reveal which usernames exist
    #[code(StatusCode::UNAUTHORIZED)]
    #[message("Invalid username or password")]
    InvalidCredentials,
    #[code(StatusCode::FORBIDDEN)]
    #[message("Account is disabled")]
    AccountDisabled,
    #[code(StatusCode::FORBIDDEN)]
    #[message("Account is banned until {until}")]
    AccountBanned { until: String },
});
