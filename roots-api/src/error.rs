use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use roots_core::NotifyError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    InternalServerError(String),
    Anyhow(anyhow::Error),
}

impl AppError {
    pub fn from_notify(err: NotifyError) -> Self {
        match err {
            NotifyError::InvalidDestination(_) => AppError::ValidationError(err.to_string()),
            other => AppError::InternalServerError(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Anyhow(err.into())
    }
}
