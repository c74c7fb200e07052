//! Blog Error Types
//!
//! Blog-specific variants that convert into the unified
//! `kernel::error::app_error::AppError` on their way out.

use axum::response::{IntoResponse, Response};
use kernel::error::conversions::classify_sqlx;
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

use crate::domain::value_object::entry_type::UnknownEntryType;
use crate::domain::value_object::slug::SlugError;

pub type BlogResult<T> = Result<T, BlogError>;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("Entry not found")]
    EntryNotFound,

    #[error("Comment not found")]
    CommentNotFound,

    #[error(transparent)]
    UnknownEntryType(#[from] UnknownEntryType),

    #[error("Comments are disabled for this entry")]
    CommentsDisabled,

    #[error("Invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),

    /// Rejected input field
    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BlogError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        BlogError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            BlogError::EntryNotFound
            | BlogError::CommentNotFound
            | BlogError::UnknownEntryType(_) => ErrorKind::NotFound,
            BlogError::CommentsDisabled => ErrorKind::Forbidden,
            BlogError::InvalidSlug(_) | BlogError::Validation { .. } => {
                ErrorKind::UnprocessableEntity
            }
            BlogError::Database(e) => classify_sqlx(e).0,
            BlogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    pub fn to_app_error(&self) -> AppError {
        match self {
            BlogError::Database(e) => {
                let (kind, message) = classify_sqlx(e);
                AppError::new(kind, message)
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    fn log(&self) {
        match self {
            BlogError::Database(e) => {
                tracing::error!(error = %e, "Blog database error");
            }
            BlogError::Internal(msg) => {
                tracing::error!(message = %msg, "Blog internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Blog error");
            }
        }
    }
}

impl IntoResponse for BlogError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<BlogError> for AppError {
    fn from(err: BlogError) -> Self {
        err.log();
        err.to_app_error()
    }
}

impl From<AppError> for BlogError {
    fn from(err: AppError) -> Self {
        BlogError::Internal(err.to_string())
    }
}
