//! HTTP mapping for domain errors.
//!
//! The domain signals failure through `AppError` return values; this module
//! decides the status code and JSON body once, so handlers just use `?`.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use ecs_core::error::AppError;
use serde_json::json;

#[derive(Debug)]
pub enum ApiError {
    /// A route that requires an active session was hit without one.
    NoSession,
    App(AppError),
}

impl From<AppError> for ApiError {
    fn from(e: AppError) -> Self {
        ApiError::App(e)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NoSession => write!(f, "authentication required"),
            ApiError::App(e) => write!(f, "{e}"),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NoSession => StatusCode::UNAUTHORIZED,
            ApiError::App(e) => match e {
                AppError::NotFound(..) => StatusCode::NOT_FOUND,
                AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
                AppError::Unauthorized(_) => StatusCode::FORBIDDEN,
                AppError::Conflict(_) | AppError::InvalidState(_) => StatusCode::CONFLICT,
                AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{status}: {self}");
        } else {
            log::debug!("{status}: {self}");
        }
        let body = match self {
            ApiError::NoSession => json!({ "error": "authentication required" }),
            // Validation errors keep their field map so forms can annotate
            // the offending inputs.
            ApiError::App(AppError::Validation(fields)) => json!({
                "error": "validation failed",
                "fields": fields,
            }),
            ApiError::App(e) => json!({ "error": e.to_string() }),
        };
        HttpResponse::build(status).json(body)
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
