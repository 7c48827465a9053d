use axum::{http::StatusCode, response::{IntoResponse, Response}, Json};
use serde_json::json;

use crate::domain::error::WalletError;

/// Envoltorio único que mapea la taxonomía de `WalletError` (§7) a códigos HTTP.
pub struct ApiError(WalletError);

impl From<WalletError> for ApiError {
    fn from(err: WalletError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            WalletError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            WalletError::InvalidData(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            WalletError::SelfTransfer(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.0.to_string()),
            WalletError::InsufficientFunds(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            WalletError::OptimisticLockExhausted { .. } => (StatusCode::CONFLICT, self.0.to_string()),
            WalletError::UserMismatch(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            WalletError::RepositoryError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
            WalletError::PublicationError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "status": "error",
            "message": message.clone(),
            "detail": message,
        }));

        (status, body).into_response()
    }
}
