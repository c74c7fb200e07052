//! Auth Error Types
//!
//! Auth-specific variants that convert into the unified
//! `kernel::error::app_error::AppError` on their way out.

use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::password::{PasswordHashError, PasswordPolicyError};
use platform::signing::SignatureError;
use thiserror::Error;

use crate::domain::value_object::email::EmailError;
use crate::domain::value_object::user_name::UserNameError;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("User not found")]
    UserNotFound,

    #[error("User name already exists")]
    UserNameTaken,

    /// Unknown user or wrong password; the two are never distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Staff access required")]
    NotStaff,

    /// Missing, tampered, expired or orphaned session cookie
    #[error("Session not found or expired")]
    SessionInvalid,

    #[error("CSRF token missing or incorrect")]
    CsrfMismatch,

    #[error("Invalid user name: {0}")]
    InvalidUserName(#[from] UserNameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Password validation failed: {0}")]
    PasswordValidation(#[from] PasswordPolicyError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::UserNameTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials | AuthError::SessionInvalid => ErrorKind::Unauthorized,
            AuthError::NotStaff | AuthError::CsrfMismatch => ErrorKind::Forbidden,
            AuthError::InvalidUserName(_)
            | AuthError::InvalidEmail(_)
            | AuthError::PasswordValidation(_) => ErrorKind::UnprocessableEntity,
            AuthError::Database(e) => classify_sqlx(e).0,
            AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.to_string());
        match self {
            AuthError::SessionInvalid => err.with_action("Please sign in again"),
            AuthError::CsrfMismatch => err.with_action("Reload the page and retry"),
            // Do not leak driver messages to clients
            AuthError::Database(e) => {
                let (kind, message) = classify_sqlx(e);
                AppError::new(kind, message)
            }
            _ => err,
        }
    }

    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid sign-in attempt");
            }
            AuthError::CsrfMismatch => {
                tracing::warn!("CSRF token mismatch");
            }
            AuthError::NotStaff => {
                tracing::warn!("Non-staff user attempted staff access");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl From<AppError> for AuthError {
    fn from(err: AppError) -> Self {
        AuthError::Internal(err.to_string())
    }
}

/// Any signature failure is an authentication failure, never a 500
impl From<SignatureError> for AuthError {
    fn from(err: SignatureError) -> Self {
        tracing::debug!(error = %err, "Rejected signed session token");
        AuthError::SessionInvalid
    }
}

impl From<PasswordHashError> for AuthError {
    fn from(err: PasswordHashError) -> Self {
        AuthError::Internal(err.to_string())
    }
}
