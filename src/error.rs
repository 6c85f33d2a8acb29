use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::{gateway::GatewayError, response::ErrorResponse};

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ValidationErrors {
    #[schema(value_type = Vec<FieldError>)]
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    Validation {
        message: String,
        details: ValidationErrors,
    },

    #[error("{0}")]
    NotFound(String),

    #[error("Gateway error")]
    Gateway(#[from] GatewayError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn validation(message: impl Into<String>, details: ValidationErrors) -> Self {
        AppError::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "ValidationError",
            AppError::NotFound(_) => "NotFound",
            AppError::Gateway(_) | AppError::Internal(_) => "InternalServerError",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Gateway(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::Validation { message, details } => ErrorResponse::new(
                self.code(),
                message.clone(),
                serde_json::to_value(details).ok(),
            ),
            AppError::NotFound(message) => ErrorResponse::new(self.code(), message.clone(), None),
            AppError::Gateway(err) => {
                tracing::error!(error = ?err, "An unexpected error occurred");
                internal_error_body()
            }
            AppError::Internal(err) => {
                tracing::error!(error = ?err, "An unexpected error occurred");
                internal_error_body()
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

pub fn internal_error_body() -> ErrorResponse {
    ErrorResponse::new("InternalServerError", "An unexpected error occurred.", None)
}

pub type AppResult<T> = Result<T, AppError>;
