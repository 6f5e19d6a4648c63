use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use placefind_core::ProviderError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Location provider unavailable: {0}")]
    Provider(#[from] ProviderError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Provider(ProviderError::Status(429)) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
        };

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
