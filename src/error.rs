//!
//! # Custom Error Handling
//!
//! This module defines the error type `AppError` returned by every board, column and
//! card operation. Each variant maps onto one HTTP status and a uniform JSON body of
//! the shape `{"error": "<message>"}`.
//!
//! `AppError` implements `actix_web::error::ResponseError`, and `From` conversions exist
//! for `sqlx::Error`, `sqlx::migrate::MigrateError`, `validator::ValidationErrors`,
//! `jsonwebtoken::errors::Error`, `bcrypt::BcryptError` and the credential
//! [`AuthError`](crate::auth::AuthError), so `?` works throughout the crate.

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::AuthError;

/// Message sent to clients for persistence failures. The underlying cause is logged.
const PERSISTENCE_FAILURE: &str = "Storage failure, please try again later";

/// Message sent to clients for any other server-side fault.
const INTERNAL_FAILURE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or expired credential, or a rejected password (HTTP 401).
    Unauthorized(String),
    /// Malformed request that could not be decoded (HTTP 400).
    BadRequest(String),
    /// Entity absent, or owned by a different board (HTTP 404).
    ///
    /// Callers cannot tell the two cases apart.
    NotFound(String),
    /// Unexpected server-side failure such as token signing or hashing (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the persistence backend (HTTP 500).
    ///
    /// The message is kept for logs only; clients receive a generic text.
    DatabaseError(String),
    /// A required field is missing or violates its constraints (HTTP 422).
    ValidationError(String),
}

impl AppError {
    pub fn not_found(entity: &str) -> Self {
        AppError::NotFound(format!("{} not found", entity))
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            AppError::DatabaseError(detail) => {
                log::error!("persistence failure: {}", detail);
                PERSISTENCE_FAILURE
            }
            AppError::InternalServerError(detail) => {
                log::error!("internal failure: {}", detail);
                INTERNAL_FAILURE
            }
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg.as_str(),
        };
        HttpResponse::build(self.status_code()).json(json!({ "error": message }))
    }
}

/// `RowNotFound` surfaces as `NotFound`; everything else is a persistence failure.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::DatabaseError(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::DatabaseError(format!("migration failed: {}", error))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Signing or decoding failures outside of verification are server faults.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::InternalServerError(format!("Failed to sign credential: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<AuthError> for AppError {
    fn from(error: AuthError) -> AppError {
        AppError::Unauthorized(error.to_string())
    }
}
