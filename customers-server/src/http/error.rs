//! API error types with IntoResponse
//!
//! Error bodies carry only the standard status text. The underlying cause
//! is logged server-side and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::db::DbError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request parameter (400)
    BadRequest { reason: String },

    /// Resource not found (404)
    NotFound { resource: &'static str, id: String },

    /// Database error (500, logged)
    Database(DbError),

    /// Internal error (500, logged)
    Internal { message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Database(_) | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            Self::BadRequest { reason } => tracing::debug!("Bad request: {}", reason),
            Self::NotFound { resource, id } => tracing::debug!("{} '{}' not found", resource, id),
            Self::Database(e) => tracing::error!("Database error: {}", e),
            Self::Internal { message } => tracing::error!("Internal error: {}", message),
        }

        let status = self.status();
        let body = status.canonical_reason().unwrap_or_default();
        (status, body).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, id } => Self::NotFound { resource, id },
            _ => Self::Database(e),
        }
    }
}
