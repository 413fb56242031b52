use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nt_core::ValidationError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub const MISSING_PAGE_MESSAGE: &str = "Please provide a page number.";
pub const INVALID_PAGE_MESSAGE: &str = "page must be a positive integer.";
pub const INTERNAL_ERROR_MESSAGE: &str = "An error occurred.";

/// Failures of the feed endpoint, in wire terms.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("internal server error")]
    Internal,
}

/// Logs the cause. The caller only ever sees a generic message.
impl From<nt_core::Error> for ApiError {
    fn from(err: nt_core::Error) -> Self {
        match err {
            nt_core::Error::Validation(err) => ApiError::Validation(err),
            err => {
                error!(error = %err, "failed to fetch feed page");
                ApiError::Internal
            }
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ApiError::Validation(ValidationError::MissingParameter(_)) => MISSING_PAGE_MESSAGE,
            ApiError::Validation(ValidationError::InvalidParameter { .. }) => INVALID_PAGE_MESSAGE,
            ApiError::Internal => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}
