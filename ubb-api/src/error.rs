//! API error handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use ubb_core::error::{ErrorKind, RegistryError};

/// API error type.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    code: String,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(status: StatusCode, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            code: code.into(),
        }
    }

    /// Bad request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message, "BAD_REQUEST")
    }

    /// Not found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message, "NOT_FOUND")
    }

    /// Internal server error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message, "INTERNAL_ERROR")
    }

    /// Returns the HTTP status.
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

/// Error response body.
#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.code,
                message: self.message,
            },
        };

        (self.status, Json(body)).into_response()
    }
}

impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        let (status, code) = match err.kind() {
            ErrorKind::PermissionDenied => (StatusCode::FORBIDDEN, "PERMISSION_DENIED"),
            ErrorKind::DuplicateKey => (StatusCode::CONFLICT, "DUPLICATE_KEY"),
            ErrorKind::UnknownReference => (StatusCode::UNPROCESSABLE_ENTITY, "UNKNOWN_REFERENCE"),
            ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ErrorKind::InvalidStateTransition => (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION"),
            ErrorKind::InvalidInput => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ErrorKind::Storage | ErrorKind::Config | ErrorKind::Internal => {
                tracing::error!(error = %err, "Internal error");
                return ApiError::internal("An internal error occurred");
            }
        };

        ApiError::new(status, err.to_string(), code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ubb_core::types::EthAddress;

    #[test]
    fn test_rule_violations_keep_reason() {
        let err = ApiError::from(RegistryError::DuplicateNationalId("1".into()));
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(err.message, "Student with this CNP has already been registered");

        let err = ApiError::from(RegistryError::PermissionDenied {
            caller: EthAddress::zero(),
        });
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.code, "PERMISSION_DENIED");
    }

    #[test]
    fn test_storage_errors_are_opaque() {
        let err = ApiError::from(RegistryError::CorruptSnapshot("bad".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message, "An internal error occurred");
    }
}
