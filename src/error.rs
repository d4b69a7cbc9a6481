use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;
use crate::provider::ProviderError;
use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Invalid order response: missing {0}")]
    InvalidOrderResponse(String),

    #[error("Order token missing from backend response; payment cannot proceed")]
    MissingOrderToken,

    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    #[error("Payment provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidOrderResponse(_) => StatusCode::BAD_GATEWAY,
            AppError::MissingOrderToken => StatusCode::BAD_GATEWAY,
            AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(ErrorData {
                error: self.to_string(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
