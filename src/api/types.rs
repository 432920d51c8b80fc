use serde::Serialize;

use crate::{AuthError, StoreError};

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: String,
    pub out_of_date: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<AuthError> for ErrorResponse {
    fn from(err: AuthError) -> Self {
        let code = match &err {
            AuthError::MissingCookie => "MISSING_SESSION",
            AuthError::UnknownSession => "UNKNOWN_SESSION",
            AuthError::Store(StoreError::DuplicateId(_)) => "DUPLICATE_SESSION",
            AuthError::Store(StoreError::InvalidId(_)) => "INVALID_SESSION_ID",
            AuthError::Store(StoreError::Backend(_)) => "STORE_UNAVAILABLE",
            AuthError::Store(StoreError::Serialization(_)) => "STORE_ERROR",
            AuthError::InvalidCookieValue => "INVALID_COOKIE_VALUE",
            AuthError::ConfigurationError(_) => "CONFIGURATION_ERROR",
        };

        // backend details stay in the logs
        let error = match &err {
            AuthError::Store(StoreError::Backend(_) | StoreError::Serialization(_))
            | AuthError::InvalidCookieValue
            | AuthError::ConfigurationError(_) => "Internal server error".to_owned(),
            _ => err.to_string(),
        };

        ErrorResponse {
            error,
            code: code.to_owned(),
        }
    }
}
