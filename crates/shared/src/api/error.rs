use std::fmt;

pub use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(feature = "backend")]
use {
    axum::response::{IntoResponse, Response},
    tracing::error,
};

/// Error type for routes that have no route specific errors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Nothing {}

impl fmt::Display for Nothing {
    fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {}
    }
}

impl std::error::Error for Nothing {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub error_messages: Vec<String>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error_messages.join("\n"))
    }
}

impl std::error::Error for ValidationError {}

/// Error returned from route handlers
///
/// `T` is the route specific error (see [`crate::api::response_errors`]). Every
/// other variant is shared between all routes. Errors are rendered to the
/// client as a plain text body.
#[derive(Debug, Error)]
pub enum ServerError<T> {
    /// Route specific error with the status code it maps to
    #[error("{inner}")]
    Inner { code: StatusCode, inner: T },
    /// The submitted form failed validation
    #[error("{inner}")]
    Validation {
        #[source]
        inner: ValidationError,
    },
    /// Error with an explicit status code and message meant for the client
    #[error("{message}")]
    StatusCode { code: StatusCode, message: String },
    /// Unexpected error. The message is logged but not sent to the client
    #[error("{message}")]
    Other { message: String },

    #[error("{context}: {}", .inner)]
    WithContext { context: String, inner: Box<Self> },
}

impl<T> ServerError<T> {
    pub fn code(&self) -> StatusCode {
        match self {
            Self::Inner { code, .. } => *code,
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::StatusCode { code, .. } => *code,
            Self::Other { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::WithContext { inner, .. } => inner.code(),
        }
    }

    /// Wraps the error with a description of what was being attempted
    pub fn context<S: Into<String>>(self, context: S) -> Self {
        Self::WithContext {
            context: context.into(),
            inner: Box::new(self),
        }
    }

    /// The route specific error, if that's what this is
    pub fn inner(&self) -> Option<&T> {
        match self {
            Self::Inner { inner, .. } => Some(inner),
            Self::WithContext { inner, .. } => inner.inner(),
            _ => None,
        }
    }
}

impl<T> From<ValidationError> for ServerError<T> {
    fn from(inner: ValidationError) -> Self {
        Self::Validation { inner }
    }
}

pub trait ServerErrorContext<T, E> {
    /// Add helpful context to the error
    fn context<S: Into<String>>(self, context: S) -> Result<T, ServerError<E>>;
}

impl<T, E> ServerErrorContext<T, E> for Result<T, ServerError<E>> {
    fn context<S: Into<String>>(self, context: S) -> Result<T, ServerError<E>> {
        self.map_err(|e| e.context(context))
    }
}

#[macro_export]
macro_rules! other_error {
    ($($arg:tt)*) => {
        $crate::api::error::ServerError::Other { message: format!($($arg)*) }
    };
}

#[macro_export]
macro_rules! status_code_error {
    ($code:expr, $($arg:tt)*) => {
        $crate::api::error::ServerError::StatusCode { code: $code, message: format!($($arg)*) }
    };
}

#[macro_export]
macro_rules! unauthorized_error {
    ($($arg:tt)*) => {
        $crate::status_code_error!($crate::api::error::StatusCode::UNAUTHORIZED, $($arg)*)
    };
}

#[macro_export]
macro_rules! bad_request_error {
    ($($arg:tt)*) => {
        $crate::status_code_error!($crate::api::error::StatusCode::BAD_REQUEST, $($arg)*)
    };
}

#[cfg(feature = "backend")]
mod backend {
    use super::*;

    impl<T> From<rusqlite::Error> for ServerError<T> {
        fn from(err: rusqlite::Error) -> Self {
            Self::Other { message: format!("rusqlite::Error: {err}") }
        }
    }

    impl<T> From<deadpool_sqlite::InteractError> for ServerError<T> {
        fn from(err: deadpool_sqlite::InteractError) -> Self {
            Self::Other { message: format!("deadpool_sqlite::InteractError: {err}") }
        }
    }

    impl<T> From<deadpool_sqlite::PoolError> for ServerError<T> {
        fn from(err: deadpool_sqlite::PoolError) -> Self {
            Self::Other { message: format!("deadpool_sqlite::PoolError: {err}") }
        }
    }

    impl<T> From<anyhow::Error> for ServerError<T> {
        fn from(err: anyhow::Error) -> Self {
            Self::Other { message: format!("{err:?}") }
        }
    }

    // Render ServerError into a plain text response
    impl<T: fmt::Display> IntoResponse for ServerError<T> {
        fn into_response(self) -> Response {
            let code = self.code();
            if code.is_server_error() {
                error!(%code, "{self}");
                (code, "Something went wrong").into_response()
            } else {
                (code, self.to_string()).into_response()
            }
        }
    }
}
