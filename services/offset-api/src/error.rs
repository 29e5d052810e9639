//! Mapping of pipeline errors to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use renderer::RenderError;
use soc_common::SocError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// Error returned by API handlers.
#[derive(Debug)]
pub enum ApiError {
    Pipeline(SocError),
    Render(RenderError),
    /// Malformed or incomplete request body.
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Pipeline(e) => StatusCode::from_u16(e.http_status_code())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Pipeline(e) => e.error_code(),
            ApiError::Render(_) => "RenderFailed",
            ApiError::BadRequest(_) => "InvalidRequest",
        }
    }

    fn message(&self) -> String {
        match self {
            ApiError::Pipeline(e) => e.to_string(),
            ApiError::Render(e) => e.to_string(),
            ApiError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl From<SocError> for ApiError {
    fn from(err: SocError) -> Self {
        ApiError::Pipeline(err)
    }
}

impl From<RenderError> for ApiError {
    fn from(err: RenderError) -> Self {
        ApiError::Render(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message(),
            code: self.code(),
        };
        (self.status(), Json(body)).into_response()
    }
}
