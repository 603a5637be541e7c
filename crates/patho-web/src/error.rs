//! 错误到HTTP状态码的映射

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use patho_core::PathoError;
use serde_json::json;
use tracing::{error, warn};

/// 处理器错误
#[derive(Debug)]
pub struct ApiError(pub PathoError);

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<PathoError> for ApiError {
    fn from(err: PathoError) -> Self {
        Self(err)
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self(PathoError::Validation(msg.into()))
    }

    pub fn status(&self) -> StatusCode {
        match &self.0 {
            PathoError::Validation(_) => StatusCode::BAD_REQUEST,
            PathoError::NotFound(_) => StatusCode::NOT_FOUND,
            PathoError::Conflict(_) | PathoError::Integrity(_) => StatusCode::CONFLICT,
            PathoError::PredictionUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            PathoError::Database(_)
            | PathoError::Storage(_)
            | PathoError::Config(_)
            | PathoError::Io(_)
            | PathoError::Serialization(_)
            | PathoError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.0.to_string();

        if status.is_server_error() {
            error!("Request failed ({}): {}", self.0.kind(), message);
        } else {
            warn!("Request rejected ({}): {}", self.0.kind(), message);
        }

        let body = Json(json!({
            "error": true,
            "message": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}
