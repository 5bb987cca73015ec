use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use sea_orm::DbErr;
use thiserror::Error;

/// Échec d'envoi d'un email par le Notifier
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DeliveryError(pub String);

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("storage error: {0}")]
    Storage(#[from] DbErr),
    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
    #[error("email already registered")]
    EmailTaken,
    #[error("invalid email or credential")]
    InvalidCredentials,
    #[error("{0}")]
    Unauthorized(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Storage(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Delivery(_) => StatusCode::BAD_GATEWAY,
            AppError::EmailTaken => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        // Les détails SQL / SMTP restent dans les logs
        let message = match self {
            AppError::Storage(e) => {
                tracing::error!(error = %e, "storage failure");
                "Internal error while accessing the database".to_string()
            }
            AppError::Delivery(e) => {
                tracing::error!(error = %e, "email delivery failure");
                "Failed to send token".to_string()
            }
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal failure");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": message
        }))
    }
}
