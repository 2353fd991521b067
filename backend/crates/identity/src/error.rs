//! Identity Error Types
//!
//! Identity-specific error variants that integrate with the unified
//! `kernel::error::AppError` system. Public messages never distinguish an
//! unknown email from a wrong password, and internal failures are rendered
//! with a generic message while the detail goes to the log.

use axum::response::{IntoResponse, Response};
use http::StatusCode;
use kernel::context::DeadlineExceeded;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::PasswordHashError;
use thiserror::Error;

/// Identity-specific result type alias
pub type IdentityResult<T> = Result<T, IdentityError>;

/// Identity-specific error variants
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Malformed request field (name, email, password, phone, profile field)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Email already registered for this role
    #[error("Email already registered")]
    DuplicateEmail,

    /// Unknown email or wrong password
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Email exists as buyer and seller, and no role was given
    #[error("Email is registered for more than one role")]
    AmbiguousIdentity,

    /// Account or profile not found
    #[error("Not found")]
    NotFound,

    /// Seller-only operation on a buyer account
    #[error("Account is not a seller")]
    NotASeller,

    /// Caller's token does not grant access to this resource
    #[error("Forbidden")]
    Forbidden,

    /// Token structure or signature rejected
    #[error("Invalid token")]
    TokenInvalid,

    /// Token past its validity window
    #[error("Token expired")]
    TokenExpired,

    /// Credential hasher failure
    #[error("Password hashing failed: {0}")]
    HashingFailure(#[from] PasswordHashError),

    /// Token could not be signed
    #[error("Token signing failed")]
    SigningFailure,

    /// Registration rolled back
    #[error("Registration failed: {0}")]
    RegistrationFailed(String),

    /// Request deadline passed
    #[error("Request deadline exceeded")]
    DeadlineExceeded,

    /// Store-level failure other than a database error (corrupt record, broken invariant)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IdentityError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.kind().status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdentityError::InvalidInput(_) => ErrorKind::BadRequest,
            IdentityError::InvalidCredentials
            | IdentityError::TokenInvalid
            | IdentityError::TokenExpired => ErrorKind::Unauthorized,
            IdentityError::Forbidden => ErrorKind::Forbidden,
            IdentityError::NotFound => ErrorKind::NotFound,
            IdentityError::DeadlineExceeded => ErrorKind::RequestTimeout,
            IdentityError::DuplicateEmail | IdentityError::AmbiguousIdentity => ErrorKind::Conflict,
            IdentityError::NotASeller => ErrorKind::UnprocessableEntity,
            IdentityError::HashingFailure(_)
            | IdentityError::SigningFailure
            | IdentityError::RegistrationFailed(_)
            | IdentityError::Storage(_)
            | IdentityError::Database(_)
            | IdentityError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            IdentityError::Database(e) => {
                tracing::error!(error = %e, "Identity database error");
            }
            IdentityError::HashingFailure(e) => {
                tracing::error!(error = %e, "Credential hashing error");
            }
            IdentityError::SigningFailure => {
                tracing::error!("Token signing error");
            }
            IdentityError::RegistrationFailed(reason) => {
                tracing::error!(reason = %reason, "Registration failed");
            }
            IdentityError::Storage(msg) | IdentityError::Internal(msg) => {
                tracing::error!(message = %msg, "Identity internal error");
            }
            IdentityError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            IdentityError::AmbiguousIdentity => {
                tracing::warn!("Login matched more than one role");
            }
            IdentityError::Forbidden | IdentityError::TokenInvalid => {
                tracing::warn!(error = %self, "Rejected token");
            }
            _ => {
                tracing::debug!(error = %self, "Identity error");
            }
        }
    }
}

impl From<IdentityError> for AppError {
    fn from(err: IdentityError) -> Self {
        let kind = err.kind();
        match err {
            IdentityError::Database(e) => AppError::from(e),
            IdentityError::DeadlineExceeded => AppError::from(DeadlineExceeded),
            IdentityError::InvalidInput(reason) => AppError::bad_request(reason),
            IdentityError::DuplicateEmail => {
                AppError::conflict("Email already registered").with_action("Sign in instead")
            }
            IdentityError::AmbiguousIdentity => {
                AppError::conflict("Email is registered for more than one role")
                    .with_action("Specify the account role")
            }
            IdentityError::TokenExpired => {
                AppError::unauthorized("Token expired").with_action("Sign in again")
            }
            err if kind.is_server_error() => {
                AppError::new(kind, "Internal server error").with_source(err)
            }
            err => AppError::new(kind, err.to_string()),
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

impl From<DeadlineExceeded> for IdentityError {
    fn from(_: DeadlineExceeded) -> Self {
        IdentityError::DeadlineExceeded
    }
}

impl From<AppError> for IdentityError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => IdentityError::InvalidInput(err.message().to_string()),
            _ => IdentityError::Internal(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (IdentityError::InvalidInput("x".into()), 400),
            (IdentityError::InvalidCredentials, 401),
            (IdentityError::TokenExpired, 401),
            (IdentityError::TokenInvalid, 401),
            (IdentityError::Forbidden, 403),
            (IdentityError::NotFound, 404),
            (IdentityError::DeadlineExceeded, 408),
            (IdentityError::DuplicateEmail, 409),
            (IdentityError::AmbiguousIdentity, 409),
            (IdentityError::NotASeller, 422),
            (IdentityError::SigningFailure, 500),
            (IdentityError::RegistrationFailed("x".into()), 500),
        ];
        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{err}");
        }
    }

    #[test]
    fn test_internal_detail_not_public() {
        let err = IdentityError::Storage("index for a@x.com is corrupt".into());
        let app_err = AppError::from(err);
        assert_eq!(app_err.kind(), ErrorKind::InternalServerError);
        assert_eq!(app_err.message(), "Internal server error");
    }

    #[test]
    fn test_from_app_error() {
        let err = IdentityError::from(AppError::bad_request("Email cannot be empty"));
        assert!(matches!(err, IdentityError::InvalidInput(ref m) if m == "Email cannot be empty"));

        let err = IdentityError::from(AppError::internal("boom"));
        assert!(matches!(err, IdentityError::Internal(_)));
    }

    #[test]
    fn test_deadline_maps_to_request_timeout() {
        let err = IdentityError::from(DeadlineExceeded);
        assert_eq!(AppError::from(err).status_code(), 408);
    }
}
