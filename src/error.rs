//! Service-wide error taxonomy and its HTTP mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::ApiResponse;
use crate::domain::aggregates::order::TransitionError;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing field, or an enum value outside the allowed set.
    #[error("{0}")]
    InvalidInput(String),

    /// Referenced user, cart or order does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Checkout attempted against a cart with zero items.
    #[error("cart is empty, nothing to order")]
    EmptyCart,

    /// Authenticated identity does not own the resource.
    #[error("unauthorized access, owner info doesn't match")]
    Unauthorized,

    #[error("token required, please login first")]
    MissingToken,

    #[error("token is invalid")]
    InvalidToken,

    #[error("session expired")]
    SessionExpired,

    /// A status change request the state machine refused.
    #[error("{0}")]
    Transition(#[from] TransitionError),

    /// Storage or serialization failure. Reported to the caller with a
    /// generic message; the detail only goes to the log.
    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

impl Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidInput(_) | Error::EmptyCart | Error::Transition(_) => {
                StatusCode::BAD_REQUEST
            }
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Unauthorized
            | Error::MissingToken
            | Error::InvalidToken
            | Error::SessionExpired => StatusCode::UNAUTHORIZED,
            Error::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match &self {
            Error::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        (self.status_code(), Json(ApiResponse::failure(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            Error::InvalidInput("bad".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::EmptyCart.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::Transition(TransitionError::Terminal).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::NotFound("order").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::SessionExpired.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            Error::Internal("db".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_message_names_the_entity() {
        assert_eq!(Error::NotFound("user").to_string(), "user not found");
        assert_eq!(Error::NotFound("cart").to_string(), "cart not found");
    }
}
