//! Error types shared by all route handlers
//!
//! Every failure is converted into the uniform JSON envelope
//! `{"success": false, "error": "..."}` before reaching the transport layer.
//! Storage errors are logged with full detail and surfaced to the client
//! as a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Application error taxonomy
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed id, invalid date, out-of-range parameter
    #[error("{0}")]
    Validation(String),

    /// No matching row, or content inactive
    #[error("{0}")]
    NotFound(String),

    /// Admin key missing or wrong
    #[error("Chave de administração inválida ou ausente")]
    Unauthorized,

    /// Stream origin did not answer within the proxy timeout
    #[error("Tempo esgotado ao conectar à origem do stream")]
    UpstreamTimeout,

    /// Stream origin unreachable or transport-level failure
    #[error("Falha ao conectar à origem do stream")]
    UpstreamProxy(String),

    /// Query execution failed; details stay in the logs
    #[error("Erro interno do servidor")]
    Storage(#[from] sqlx::Error),

    /// Response serialization failed
    #[error("Erro interno do servidor")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::UpstreamTimeout => StatusCode::GATEWAY_TIMEOUT,
            ApiError::UpstreamProxy(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) | ApiError::Serialization(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Storage(e) => {
                tracing::error!(error = %e, "storage error");
            }
            ApiError::Serialization(e) => {
                tracing::error!(error = %e, "response serialization error");
            }
            ApiError::UpstreamProxy(detail) => {
                tracing::error!(detail = %detail, "stream proxy error");
            }
            ApiError::UpstreamTimeout => {
                tracing::error!("stream proxy timeout");
            }
            _ => {}
        }

        let body = Json(serde_json::json!({
            "success": false,
            "error": self.to_string(),
        }));

        (self.status(), body).into_response()
    }
}

/// Parse a named request parameter as a numeric id
pub fn parse_param(name: &str, raw: &str) -> Result<i32, ApiError> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| ApiError::Validation(format!("{} inválido: {}", name, raw)))
}

/// Parse a path segment as a numeric id
pub fn parse_id(raw: &str) -> Result<i32, ApiError> {
    parse_param("id", raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id(" 7 ").unwrap(), 7);
        assert!(parse_id("abc").is_err());
        assert!(parse_id("1.5").is_err());
        assert!(parse_id("").is_err());
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::UpstreamTimeout.status(), StatusCode::GATEWAY_TIMEOUT);
    }
}
