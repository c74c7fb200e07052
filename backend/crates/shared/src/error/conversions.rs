//! Conversions into and out of [`AppError`]

#[cfg(feature = "sqlx")]
use super::app_error::AppError;
#[cfg(feature = "sqlx")]
use super::kind::ErrorKind;

/// Kind and client-safe message for a driver error, by PostgreSQL SQLSTATE
///
/// <https://www.postgresql.org/docs/current/errcodes-appendix.html>
#[cfg(feature = "sqlx")]
pub fn classify_sqlx(err: &sqlx::Error) -> (ErrorKind, &'static str) {
    match err {
        sqlx::Error::RowNotFound => (ErrorKind::NotFound, "Record not found"),
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => {
            (ErrorKind::ServiceUnavailable, "Database unavailable")
        }
        sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
            Some("23505") => (ErrorKind::Conflict, "Duplicate key value"),
            Some("23503") => (ErrorKind::Conflict, "Referenced record missing"),
            Some("23502" | "23514") => (ErrorKind::BadRequest, "Constraint violation"),
            Some(code) if code.starts_with("53") || code.starts_with("57") => {
                (ErrorKind::ServiceUnavailable, "Database unavailable")
            }
            _ => (ErrorKind::InternalServerError, "Database error"),
        },
        _ => (ErrorKind::InternalServerError, "Database error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let (kind, message) = classify_sqlx(&err);
        AppError::new(kind, message).with_source(err)
    }
}

/// Problem details JSON with the matching status
#[cfg(feature = "axum")]
impl axum::response::IntoResponse for super::app_error::AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;
        use axum::http::{HeaderValue, StatusCode, header};

        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = (status, Json(self.problem())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
