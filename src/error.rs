//!
//! # Error Handling
//!
//! `AppError` is the single error type returned by handlers, extractors and
//! middleware. It implements `actix_web::error::ResponseError`, so every failure
//! is translated into a JSON body of the shape `{"error": message}` with the
//! matching status code, and is logged before the response leaves the server.
//!
//! Server-side failures (database, hashing, signing) never leak their details to
//! the client: the body is always the generic `"Internal Server Error"`.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

pub const NO_TOKEN: &str = "Access denied. No token provided.";
pub const INVALID_TOKEN: &str = "Access denied. Invalid token.";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const FORBIDDEN: &str = "Unauthorized";
pub const TASK_NOT_FOUND: &str = "Task not found";
pub const USERNAME_TAKEN: &str = "Username already exists";
pub const INTERNAL: &str = "Internal Server Error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, malformed or expired credential, or a failed login (HTTP 401).
    Unauthorized(String),
    /// Authenticated caller lacks the role a route requires (HTTP 403).
    Forbidden(String),
    /// Request body could not be parsed (HTTP 400).
    BadRequest(String),
    /// Resource does not exist or is not owned by the caller (HTTP 404).
    NotFound(String),
    /// Unique constraint violated, e.g. a duplicate username (HTTP 409).
    Conflict(String),
    /// Request parsed but failed presence validation (HTTP 422).
    ValidationError(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the storage layer (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message that is safe to hand back to the client.
    fn public_message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::ValidationError(msg) => msg,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => INTERNAL,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::warn!("{}", self);
        }

        HttpResponse::build(status).json(json!({
            "error": self.public_message()
        }))
    }
}

/// Unique violations surface as `Conflict`; the only unique column outside the
/// primary keys is `users.username`.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict(USERNAME_TAKEN.into())
            }
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Any token failure (malformed, expired, bad signature) collapses into one message.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        log::debug!("token rejected: {}", error);
        AppError::Unauthorized(INVALID_TOKEN.into())
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.error_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body()).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_error_statuses() {
        assert_eq!(AppError::Unauthorized("x".into()).status_code(), 401);
        assert_eq!(AppError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(AppError::BadRequest("x".into()).status_code(), 400);
        assert_eq!(AppError::NotFound("x".into()).status_code(), 404);
        assert_eq!(AppError::Conflict("x".into()).status_code(), 409);
        assert_eq!(AppError::ValidationError("x".into()).status_code(), 422);
        assert_eq!(AppError::InternalServerError("x".into()).status_code(), 500);
        assert_eq!(AppError::DatabaseError("x".into()).status_code(), 500);
    }

    #[actix_rt::test]
    async fn test_client_errors_carry_their_message() {
        let (status, body) = body_json(AppError::NotFound(TASK_NOT_FOUND.into())).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Task not found" }));
    }

    #[actix_rt::test]
    async fn test_server_errors_hide_details() {
        let (status, body) =
            body_json(AppError::DatabaseError("no such table: tasks".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal Server Error" }));
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        match AppError::from(sqlx::Error::RowNotFound) {
            AppError::NotFound(_) => {}
            other => panic!("unexpected mapping: {:?}", other),
        }
    }

    #[test]
    fn test_jwt_errors_collapse_to_invalid_token() {
        let err = jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::ExpiredSignature,
        );
        match AppError::from(err) {
            AppError::Unauthorized(msg) => assert_eq!(msg, INVALID_TOKEN),
            other => panic!("unexpected mapping: {:?}", other),
        }
    }
}
