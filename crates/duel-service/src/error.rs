//! HTTP error mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use duel_core::EngineError;

/// Application error type
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<EngineError> for AppError {
    fn from(e: EngineError) -> Self {
        let status = match &e {
            EngineError::InvalidMove(_) | EngineError::InvalidStake => StatusCode::BAD_REQUEST,
            EngineError::InsufficientCredit { .. } => StatusCode::PAYMENT_REQUIRED,
            EngineError::DepositFailed(_) | EngineError::PayoutFailed(_) => StatusCode::BAD_GATEWAY,
            EngineError::UnknownOrResolvedGame(_) => StatusCode::CONFLICT,
            EngineError::Unauthorized(_) => StatusCode::FORBIDDEN,
            EngineError::BalanceOverflow => StatusCode::UNPROCESSABLE_ENTITY,
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({"error": self.message})),
        )
            .into_response()
    }
}
