use crate::domain::models::RangeError;
use crate::services::mailer::MailError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Please enter both email and password")]
    MissingCredentials,
    #[error("{0}")]
    OutOfRange(#[from] RangeError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Please log in to continue")]
    Unauthorized,
    #[error("Too many reminders sent, try again later")]
    TooManyRequests,
    #[error("Email failed: {0}")]
    Mail(#[from] MailError),
    #[error("internal error")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingCredentials | ApiError::OutOfRange(_) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Mail(_) => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(detail) = &self {
            tracing::error!("Request failed: {}", detail);
        }
        let status = self.status();
        (status, Json(ErrorBody { error: self.to_string() })).into_response()
    }
}
