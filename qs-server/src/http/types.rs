// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::HandshakeError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::{debug, error, warn};

pub use qs_server_requests::api::ErrorResponse;

#[derive(Debug, Clone)]
pub struct RequestError {
    pub(crate) inner: ErrorResponse,

    pub(crate) status: StatusCode,
}

impl RequestError {
    pub fn new<S: Into<String>>(message: S, status: StatusCode) -> Self {
        RequestError {
            inner: ErrorResponse {
                message: message.into(),
            },
            status,
        }
    }

    pub fn new_bad_request<S: Into<String>>(message: S) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        (self.status, Json(self.inner)).into_response()
    }
}

// callers only ever learn the kind of the failure, the details stay in the logs
impl From<HandshakeError> for RequestError {
    fn from(err: HandshakeError) -> Self {
        let (message, status) = match &err {
            HandshakeError::InvalidInput { .. } => ("invalid input", StatusCode::BAD_REQUEST),
            HandshakeError::CiphertextReplayed { .. } => (
                "the ciphertext has already been used",
                StatusCode::BAD_REQUEST,
            ),
            HandshakeError::NotFound { .. } => ("unknown session", StatusCode::NOT_FOUND),
            HandshakeError::NoKeyPair => (
                "no keypair has been generated for this session",
                StatusCode::CONFLICT,
            ),
            HandshakeError::InvalidState { .. } => (
                "the session is currently busy, try again later",
                StatusCode::CONFLICT,
            ),
            HandshakeError::TooManySessions { .. } => (
                "the server can't accept any new sessions at the moment",
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            HandshakeError::Timeout { .. } => (
                "the operation has timed out",
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            HandshakeError::PrimitiveFailure { .. } => (
                "the operation has failed",
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        };

        if status.is_server_error() {
            match err {
                HandshakeError::PrimitiveFailure { .. } => error!("request failure: {err}"),
                _ => warn!("request failure: {err}"),
            }
        } else {
            debug!("rejected request: {err}");
        }

        RequestError::new(message, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SessionId;
    use std::time::Duration;

    #[test]
    fn details_are_not_exposed() {
        let err: RequestError = HandshakeError::primitive_failure("secret detail").into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.inner.message.contains("secret detail"));

        let id = SessionId::random();
        let err: RequestError = HandshakeError::NotFound { session_id: id }.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(!err.inner.message.contains(&id.to_string()));
    }

    #[test]
    fn error_kinds_map_to_statuses() {
        let cases = [
            (HandshakeError::invalid_input("x"), StatusCode::BAD_REQUEST),
            (
                HandshakeError::CiphertextReplayed {
                    session_id: SessionId::random(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (HandshakeError::NoKeyPair, StatusCode::CONFLICT),
            (
                HandshakeError::InvalidState {
                    reason: "busy".into(),
                },
                StatusCode::CONFLICT,
            ),
            (
                HandshakeError::TooManySessions { max: 1 },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                HandshakeError::Timeout {
                    timeout: Duration::from_secs(1),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(RequestError::from(err).status(), expected);
        }
    }
}
