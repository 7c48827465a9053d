use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::domain::error::HistoryError;

pub struct ApiError(pub HistoryError);

impl From<HistoryError> for ApiError {
    fn from(err: HistoryError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self.0 {
            HistoryError::InvalidQuery(ref msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            HistoryError::RepositoryError(ref e) => {
                tracing::error!("history repository error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
            HistoryError::SerializationError(ref e) => {
                tracing::error!("history serialization error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "status": "error",
            "message": message.clone(),
            "detail": message,
        }));

        (status, body).into_response()
    }
}
