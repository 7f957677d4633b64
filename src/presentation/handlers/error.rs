use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::application::services::{DispatchError, TransitionError};

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

pub fn error_body(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// HTTP shape of a lifecycle failure: rule violations and lost races are
/// conflicts, permission misses are forbidden, storage trouble is a
/// plain 500.
pub fn lifecycle_error_response(err: TransitionError) -> Response {
    let status = match &err {
        TransitionError::InvalidTransition { .. }
        | TransitionError::Conflict { .. }
        | TransitionError::AddOnRejected { .. } => StatusCode::CONFLICT,
        TransitionError::Unauthorized { .. } => StatusCode::FORBIDDEN,
        TransitionError::NotFound { .. } => StatusCode::NOT_FOUND,
        TransitionError::Settlement(_) | TransitionError::Repository(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(error = %err, "Lifecycle operation failed");
    }

    error_body(status, err.to_string())
}

pub fn dispatch_error_response(err: DispatchError) -> Response {
    match err {
        DispatchError::NoActiveOffer => error_body(StatusCode::NOT_FOUND, err.to_string()),
        DispatchError::OfferExpired => error_body(StatusCode::GONE, err.to_string()),
        DispatchError::NotAvailable => error_body(StatusCode::CONFLICT, err.to_string()),
        DispatchError::Lifecycle(inner) => lifecycle_error_response(inner),
        DispatchError::Repository(_) => {
            tracing::error!(error = %err, "Dispatch operation failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}
