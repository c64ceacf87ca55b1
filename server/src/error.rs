//! Error types for the habits server
//!
//! All errors use thiserror for structured error handling.
//! The HTTP adapter turns them into JSON error responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {field}: {message}")]
    Validation { field: &'static str, message: String },

    #[error("Habit not found: {0}")]
    HabitNotFound(String),

    #[error("Habit {habit_id} is not due on {date}")]
    NotEligible { habit_id: String, date: NaiveDate },

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        AppError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Offending input field, for validation failures
    pub fn field(&self) -> Option<&'static str> {
        match self {
            AppError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::HabitNotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotEligible { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Database(_)
            | AppError::Io(_)
            | AppError::Serialization(_)
            | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Storage and IO details stay in the log
        let error = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            tracing::debug!("Request rejected: {}", self);
            self.to_string()
        };

        let body = ErrorBody {
            error,
            field: self.field(),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
