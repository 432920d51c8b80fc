use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::ErrorResponse;
use crate::{AuthError, StoreError};

/// converts `AuthError` into appropriate HTTP responses
#[derive(Debug)]
pub struct AppError(pub AuthError);

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        Self(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        Self(AuthError::Store(err))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuthError::MissingCookie | AuthError::UnknownSession => StatusCode::UNAUTHORIZED,
            AuthError::Store(StoreError::DuplicateId(_)) => StatusCode::CONFLICT,
            AuthError::Store(StoreError::InvalidId(_)) => StatusCode::BAD_REQUEST,
            AuthError::Store(StoreError::Backend(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AuthError::Store(StoreError::Serialization(_))
            | AuthError::InvalidCookieValue
            | AuthError::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let AuthError::ConfigurationError(msg) = &self.0 {
            log::error!(target: "sessionward", "msg=\"misconfigured session middleware\" error=\"{msg}\"");
        }

        (status, Json(ErrorResponse::from(self.0))).into_response()
    }
}
