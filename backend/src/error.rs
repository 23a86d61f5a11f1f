//! Error handling for the Éden backend
//!
//! Provides consistent error responses in English and Portuguese

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::{PromptViolation, MAX_PROMPT_CHARS};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authorization errors
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_pt: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid session")]
    InvalidSession,

    #[error(transparent)]
    Guardrail(#[from] PromptViolation),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Availability errors
    #[error("AI unavailable: missing API key")]
    AiUnavailable,

    // Upstream errors
    #[error("Weather API error: {0}")]
    WeatherUpstream(String),

    #[error("Upstream error ({status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("Too many requests")]
    RateLimited,

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_pt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "UNAUTHORIZED".to_string(),
                    message_en: message.clone(),
                    message_pt: "Não autorizado".to_string(),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_pt,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: message_pt.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_pt: format!("Dados inválidos: {}", msg),
                    field: None,
                },
            ),
            AppError::InvalidSession => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_SESSION".to_string(),
                    message_en: "Invalid session. Reload the page and try again.".to_string(),
                    message_pt: "Sessão inválida. Recarregue a página e tente novamente."
                        .to_string(),
                    field: None,
                },
            ),
            AppError::Guardrail(violation) => {
                let (status, code) = match violation {
                    PromptViolation::Empty => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    PromptViolation::TooLong { .. } => {
                        (StatusCode::PAYLOAD_TOO_LARGE, "PROMPT_TOO_LONG")
                    }
                    PromptViolation::ForbiddenTopic => {
                        (StatusCode::BAD_REQUEST, "FORBIDDEN_TOPIC")
                    }
                };
                (
                    status,
                    ErrorDetail {
                        code: code.to_string(),
                        message_en: match violation {
                            PromptViolation::Empty => "The 'prompt' field is required".to_string(),
                            PromptViolation::TooLong { .. } => format!(
                                "Your text is too long (>{MAX_PROMPT_CHARS} characters). \
                                 Summarize and try again."
                            ),
                            PromptViolation::ForbiddenTopic => {
                                "I can't help with that topic. I can advise on irrigation, crop \
                                 management, pests, weather, soil and good agricultural practices."
                                    .to_string()
                            }
                        },
                        message_pt: violation.message_pt(),
                        field: None,
                    },
                )
            }
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_pt: format!("{} não encontrado", resource),
                    field: None,
                },
            ),
            AppError::AiUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorDetail {
                    code: "AI_UNAVAILABLE".to_string(),
                    message_en: "AI unavailable: missing GEMINI_API_KEY".to_string(),
                    message_pt: "IA indisponível: chave da API não configurada".to_string(),
                    field: None,
                },
            ),
            AppError::WeatherUpstream(message) => (
                StatusCode::BAD_GATEWAY,
                ErrorDetail {
                    code: "FETCH_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: "Erro ao buscar dados do clima".to_string(),
                    field: None,
                },
            ),
            AppError::Upstream { status, message } => (
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY),
                ErrorDetail {
                    code: "UPSTREAM_ERROR".to_string(),
                    message_en: message.clone(),
                    message_pt: format!("Erro na API externa: {}", message),
                    field: None,
                },
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                ErrorDetail {
                    code: "RATE_LIMITED".to_string(),
                    message_en: "Too many requests, try again later".to_string(),
                    message_pt: "Muitas requisições, tente novamente mais tarde".to_string(),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_pt: "Erro no banco de dados".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_pt: "Erro interno do servidor".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_pt: "Erro interno do servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
