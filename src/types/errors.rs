use std::fmt::{Display, Formatter};

use super::HttpResponse;

/// # Error
/// General error
#[derive(Debug, Clone)]
pub struct Error {
    /// Error message
    pub message: String,
}

/// # TypeError
/// Raised when the caller passes an input the client cannot work with
#[derive(Debug, Clone)]
pub struct TypeError {
    /// Error message
    pub message: String,
}

/// # AuthenticationError
/// Raised when the identity provider refuses to issue a token or answers with
/// something that cannot be turned into one
#[derive(Debug, Clone)]
pub struct AuthenticationError {
    /// Human readable message. Never contains token values.
    pub message: String,
    /// `error` field of the provider response, if any
    pub error: Option<String>,
    /// `error_description` field of the provider response, if any
    pub error_description: Option<String>,
}

/// # ErrorWithResponse
/// An error payload together with the response that caused it
#[derive(Debug, Clone)]
pub struct ErrorWithResponse<T> {
    /// The error
    pub error: T,
    /// Response of the failed request, when the error came from a request
    pub response: Option<HttpResponse>,
}

/// # OidcClientError
/// Error That will be returned to the end user of this library
#[derive(Debug)]
pub enum OidcClientError {
    /// Internal failure
    Error(Error, Option<HttpResponse>),
    /// Invalid input
    TypeError(TypeError, Option<HttpResponse>),
    /// Token could not be obtained
    AuthenticationError(AuthenticationError, Option<HttpResponse>),
}

/// Result type used throughout the crate
pub type OidcReturnType<T> = Result<T, Box<OidcClientError>>;

impl OidcClientError {
    /// Checks if the Error is [OidcClientError::Error]
    pub fn is_error(&self) -> bool {
        matches!(self, OidcClientError::Error(..))
    }

    /// Checks if the Error is [OidcClientError::TypeError]
    pub fn is_type_error(&self) -> bool {
        matches!(self, OidcClientError::TypeError(..))
    }

    /// Checks if the Error is [OidcClientError::AuthenticationError]
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, OidcClientError::AuthenticationError(..))
    }

    /// Returns the [Error] with the response. Panics if the variant is not [OidcClientError::Error]
    pub fn error(self) -> ErrorWithResponse<Error> {
        match self {
            OidcClientError::Error(error, response) => ErrorWithResponse { error, response },
            _ => panic!("Not an Error"),
        }
    }

    /// Returns the [TypeError] with the response. Panics if the variant is not [OidcClientError::TypeError]
    pub fn type_error(self) -> ErrorWithResponse<TypeError> {
        match self {
            OidcClientError::TypeError(error, response) => ErrorWithResponse { error, response },
            _ => panic!("Not a TypeError"),
        }
    }

    /// Returns the [AuthenticationError] with the response.
    /// Panics if the variant is not [OidcClientError::AuthenticationError]
    pub fn authentication_error(self) -> ErrorWithResponse<AuthenticationError> {
        match self {
            OidcClientError::AuthenticationError(error, response) => {
                ErrorWithResponse { error, response }
            }
            _ => panic!("Not an AuthenticationError"),
        }
    }

    /// Response attached to the error, if any
    pub fn response(&self) -> Option<&HttpResponse> {
        match self {
            OidcClientError::Error(_, r)
            | OidcClientError::TypeError(_, r)
            | OidcClientError::AuthenticationError(_, r) => r.as_ref(),
        }
    }

    /// The error message
    pub fn message(&self) -> &str {
        match self {
            OidcClientError::Error(e, _) => &e.message,
            OidcClientError::TypeError(e, _) => &e.message,
            OidcClientError::AuthenticationError(e, _) => &e.message,
        }
    }

    pub(crate) fn new_error(message: &str, response: Option<HttpResponse>) -> Self {
        OidcClientError::Error(
            Error {
                message: message.to_string(),
            },
            response,
        )
    }

    pub(crate) fn new_type_error(message: &str, response: Option<HttpResponse>) -> Self {
        OidcClientError::TypeError(
            TypeError {
                message: message.to_string(),
            },
            response,
        )
    }

    pub(crate) fn new_authentication_error(
        message: &str,
        error: Option<String>,
        error_description: Option<String>,
        response: Option<HttpResponse>,
    ) -> Self {
        OidcClientError::AuthenticationError(
            AuthenticationError {
                message: message.to_string(),
                error,
                error_description,
            },
            response,
        )
    }
}

impl Display for OidcClientError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OidcClientError::Error(..) => "Error",
            OidcClientError::TypeError(..) => "TypeError",
            OidcClientError::AuthenticationError(..) => "AuthenticationError",
        };
        write!(f, "{name}: {}", self.message())
    }
}

impl std::error::Error for OidcClientError {}
