use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;

use crate::member::{MemberRepository, PagingStrategy};

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub member_repository: Arc<dyn MemberRepository + Send + Sync>,
    pub paging: PagingStrategy,
    pub default_page_size: i64,
}

impl AppState {
    pub fn new(
        member_repository: Arc<dyn MemberRepository + Send + Sync>,
        paging: PagingStrategy,
        default_page_size: i64,
    ) -> Self {
        Self {
            member_repository,
            paging,
            default_page_size,
        }
    }
}

/// Request-scoped error taxonomy. Every variant maps to one HTTP status;
/// nothing here is fatal to the process and no failed store call is
/// retried.
#[derive(Error, Debug)]
pub enum AppError {
    /// Requested page outside the valid range. The message carries the
    /// range; the page is never silently clamped.
    #[error("invalid page: {0}")]
    InvalidPage(String),

    /// Rejected before reaching the store: empty name, negative
    /// statistics, mismatched identifiers, non-positive page size.
    #[error("validation error: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Concurrent modification detected by the store. The caller must
    /// re-fetch and re-submit.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Transport or storage failure. Carries a short stable description;
    /// the upstream detail is logged, not returned.
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidPage(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::StoreUnavailable(msg) => (StatusCode::BAD_GATEWAY, msg),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}
