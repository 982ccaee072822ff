use axum::extract::rejection::{FormRejection, JsonRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tinylink_shortener::ShortenerError;
use tracing::{debug, error};

use crate::model::ErrorResponse;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    Shortener(ShortenerError),
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Shortener(err) => match err {
                ShortenerError::NotFound(_) => StatusCode::NOT_FOUND,
                ShortenerError::InvalidInput(_)
                | ShortenerError::InvalidShortCode(_)
                | ShortenerError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
                ShortenerError::GenerationExhausted(_) | ShortenerError::Storage(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl From<ShortenerError> for AppError {
    fn from(value: ShortenerError) -> Self {
        AppError::Shortener(value)
    }
}

impl From<JsonRejection> for AppError {
    fn from(value: JsonRejection) -> Self {
        AppError::BadRequest(value.body_text())
    }
}

impl From<FormRejection> for AppError {
    fn from(value: FormRejection) -> Self {
        AppError::BadRequest(value.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = if status.is_server_error() {
            error!(error = ?self, "request failed");
            "Internal server error".to_string()
        } else {
            debug!(error = ?self, status = %status, "request rejected");
            match self {
                AppError::Shortener(err) => err.to_string(),
                AppError::BadRequest(message) => message,
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}
