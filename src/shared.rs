use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::config::AppConfig;
use crate::session::TokenConfig;
use crate::store::DocumentStore;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub token_config: TokenConfig,
    pub store: Arc<dyn DocumentStore + Send + Sync>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore + Send + Sync>) -> Self {
        let token_config = TokenConfig::from_config(&config);
        Self {
            config: Arc::new(config),
            token_config,
            store,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("JWT error: {0}")]
    JwtError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::JwtError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Token error: {}", msg),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::DatabaseError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {}", msg),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "message": message
        }));

        (status, body).into_response()
    }
}

/// Rejects blank values of a required text field
pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    require_non_empty("email", email)?;
    match email.trim().split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(AppError::Validation(format!("Invalid email: {}", email))),
    }
}

/// Monetary amounts must be finite and not negative
pub fn validate_amount(field: &str, amount: f64) -> Result<(), AppError> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(AppError::Validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}
