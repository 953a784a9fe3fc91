use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::{Error, PersistenceError, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Pipeline(#[from] Error),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        ApiError::Pipeline(err.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::Pipeline(err.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::Pipeline(e) => e.user_message(),
            ApiError::BadRequest(_) => "Invalid request body".into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, %status, "Request failed");
        } else {
            tracing::warn!(error = %self, %status, "Request rejected");
        }

        let body = ErrorResponse {
            error: self.user_message(),
        };

        (status, Json(body)).into_response()
    }
}
