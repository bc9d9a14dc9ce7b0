use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::drafts::DraftError;
use crate::application::repos::RepoError;
use crate::application::tips::TipError;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

pub mod codes {
    pub const NOT_FOUND: &str = "not_found";
    pub const STORE_UNAVAILABLE: &str = "store_unavailable";
    pub const INTERNAL: &str = "internal_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Diagnostic attached to error responses so the logging middleware can
/// emit detail the public body hides.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub source: &'static str,
    pub detail: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: &'static str,
    hint: Option<String>,
    source: &'static str,
    detail: String,
}

impl ApiError {
    fn new(
        status: StatusCode,
        code: &'static str,
        message: &'static str,
        hint: Option<String>,
        source: &'static str,
        detail: String,
    ) -> Self {
        Self {
            status,
            code,
            message,
            hint,
            source,
            detail,
        }
    }

    pub fn not_found(source: &'static str, message: &'static str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            codes::NOT_FOUND,
            message,
            None,
            source,
            message.to_string(),
        )
    }

    pub fn store_unavailable(source: &'static str, detail: String) -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            codes::STORE_UNAVAILABLE,
            "store temporarily unavailable",
            Some("the backing store did not respond; retry later".to_string()),
            source,
            detail,
        )
    }

    pub fn internal(source: &'static str, detail: String) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            codes::INTERNAL,
            "internal error",
            None,
            source,
            detail,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: ApiErrorMessage {
                code: self.code.to_string(),
                message: self.message.to_string(),
                hint: self.hint,
            },
        };
        let mut response = (self.status, Json(body)).into_response();
        response.extensions_mut().insert(ErrorReport {
            source: self.source,
            detail: self.detail,
        });
        response
    }
}

pub fn tip_error_to_api(source: &'static str, err: TipError) -> ApiError {
    match err {
        TipError::NotFound => ApiError::not_found(source, "tip not found"),
        TipError::Repo(err) => repo_error_to_api(source, err),
    }
}

pub fn draft_error_to_api(source: &'static str, err: DraftError) -> ApiError {
    match err {
        DraftError::Repo(err) => repo_error_to_api(source, err),
    }
}

fn repo_error_to_api(source: &'static str, err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ApiError::not_found(source, "resource not found"),
        RepoError::Timeout => ApiError::store_unavailable(source, "store timeout".to_string()),
        RepoError::Persistence(detail) => ApiError::internal(source, detail),
    }
}
