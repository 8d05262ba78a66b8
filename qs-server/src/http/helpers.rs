// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::http::state::AppState;
use crate::http::types::RequestError;
use crate::registry::SessionId;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qs_server_requests::api::models::EncapsulateRequest;
use qs_server_requests::SESSION_ID_HEADER;
use tracing::debug;

/// Session the request operates on: either the one named in the session header
/// or, in its absence, the implicit session (if enabled).
#[derive(Debug, Clone, Copy)]
pub struct RequestedSession(pub Option<SessionId>);

#[async_trait]
impl FromRequestParts<AppState> for RequestedSession {
    type Rejection = RequestError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(SESSION_ID_HEADER) else {
            return Ok(RequestedSession(state.implicit_session()));
        };

        let id = raw
            .to_str()
            .map_err(|_| RequestError::new_bad_request("malformed session id"))?
            .parse::<SessionId>()
            .map_err(|err| {
                debug!("received malformed session id: {err}");
                RequestError::new_bad_request("malformed session id")
            })?;
        Ok(RequestedSession(Some(id)))
    }
}

/// Response header announcing the session the operation has been performed on.
pub fn session_header(session_id: SessionId) -> [(&'static str, String); 1] {
    [(SESSION_ID_HEADER, session_id.to_base58_string())]
}

pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

pub fn decode_bytes(field: &'static str, encoded: &str) -> Result<Vec<u8>, RequestError> {
    STANDARD.decode(encoded.trim()).map_err(|err| {
        debug!("received malformed {field}: {err}");
        RequestError::new_bad_request(format!("malformed {field}"))
    })
}

/// Extracts the base64 public key from the encapsulation request body.
/// The key might be sent as plain text, as a json string or as an [`EncapsulateRequest`].
/// An empty body (or a missing key) means no key has been provided.
pub fn requested_public_key(body: &str) -> Result<Option<String>, RequestError> {
    let body = body.trim();
    let public_key = if body.is_empty() {
        None
    } else if body.starts_with('{') {
        serde_json::from_str::<EncapsulateRequest>(body)
            .map_err(|_| RequestError::new_bad_request("malformed request body"))?
            .public_key
    } else if body.starts_with('"') {
        Some(
            serde_json::from_str::<String>(body)
                .map_err(|_| RequestError::new_bad_request("malformed request body"))?,
        )
    } else {
        Some(body.to_string())
    };

    Ok(public_key.filter(|key| !key.trim().is_empty()))
}
