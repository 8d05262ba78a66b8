// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::HandshakeError;
use crate::http::helpers::{
    decode_bytes, encode_bytes, requested_public_key, session_header, RequestedSession,
};
use crate::http::state::AppState;
use crate::http::types::RequestError;
use crate::registry::SessionSnapshot;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use qs_server_requests::api::models::{
    DecapsulateRequest, DecapsulateResponse, EncapsulateResponse, GenerateKeysResponse,
    SessionResponse,
};
use qs_server_requests::api::ErrorResponse;
use qs_server_requests::routes::api::quantum as quantum_routes;
use tracing::debug;

pub(crate) const DECAPSULATION_SUCCESS: &str = "Success. Quantum-safe channel established.";

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route(quantum_routes::KEYS, post(generate_keys))
        .route(quantum_routes::ENCAPSULATE, post(encapsulate))
        .route(quantum_routes::DECAPSULATE, post(decapsulate))
        .route(quantum_routes::SESSION, get(session).delete(reset_session))
}

/// Generates a new keypair, storing its secret key within the session.
/// Without a session token (and with the implicit session disabled) a new session is created.
#[utoipa::path(
    post,
    path = "/api/quantum/keys",
    tag = "Quantum",
    params(
        ("x-qs-session-id" = Option<String>, Header, description = "token of an existing session to re-key")
    ),
    responses(
        (status = 200, body = GenerateKeysResponse),
        (status = 400, body = ErrorResponse, description = "malformed session token"),
        (status = 404, body = ErrorResponse, description = "unknown session"),
        (status = 503, body = ErrorResponse, description = "session limit reached or the operation has timed out"),
    ),
)]
pub(crate) async fn generate_keys(
    State(state): State<AppState>,
    RequestedSession(session): RequestedSession,
) -> Result<impl IntoResponse, RequestError> {
    let coordinator = state.coordinator();
    let keys = coordinator.generate_keys(session).await?;

    let algorithm = coordinator.kem().name();
    let response = GenerateKeysResponse {
        public_key: encode_bytes(keys.public_key.as_bytes()),
        session_id: keys.session_id.to_base58_string(),
        algorithm: algorithm.to_string(),
        message: format!(
            "{algorithm} keypair generated. The secret key is held in server memory only."
        ),
    };

    Ok((session_header(keys.session_id), Json(response)))
}

/// Encapsulates a fresh shared secret against the provided public key.
/// With an empty body, the public key of the caller's session is used.
#[utoipa::path(
    post,
    path = "/api/quantum/encapsulate",
    tag = "Quantum",
    request_body(
        content = String,
        description = "base64-encoded public key, either as plain text, json string or `EncapsulateRequest`",
        content_type = "text/plain"
    ),
    params(
        ("x-qs-session-id" = Option<String>, Header, description = "token of the session to bind the ciphertext to")
    ),
    responses(
        (status = 200, body = EncapsulateResponse),
        (status = 400, body = ErrorResponse, description = "malformed public key"),
        (status = 409, body = ErrorResponse, description = "no public key has been provided and the session holds none"),
    ),
)]
pub(crate) async fn encapsulate(
    State(state): State<AppState>,
    RequestedSession(session): RequestedSession,
    body: String,
) -> Result<impl IntoResponse, RequestError> {
    let coordinator = state.coordinator();

    let encapsulation = match requested_public_key(&body)? {
        Some(encoded) => {
            let public_key = decode_bytes("public key", &encoded)?;
            coordinator.encapsulate(session, &public_key).await?
        }
        None => {
            let session = session.ok_or(HandshakeError::NoKeyPair)?;
            coordinator.encapsulate_to_session(session).await?
        }
    };

    let response = Json(EncapsulateResponse {
        ciphertext: encode_bytes(encapsulation.ciphertext.as_bytes()),
        shared_secret: encode_bytes(encapsulation.shared_secret.as_bytes()),
    });

    match session {
        Some(session) if encapsulation.bound_to_session => {
            Ok((session_header(session), response).into_response())
        }
        _ => Ok(response.into_response()),
    }
}

/// Recovers the shared secret from the ciphertext using the secret key of the session.
#[utoipa::path(
    post,
    path = "/api/quantum/decapsulate",
    tag = "Quantum",
    request_body = DecapsulateRequest,
    params(
        ("x-qs-session-id" = Option<String>, Header, description = "token of the session holding the secret key")
    ),
    responses(
        (status = 200, body = DecapsulateResponse),
        (status = 400, body = ErrorResponse, description = "malformed or already used ciphertext"),
        (status = 404, body = ErrorResponse, description = "unknown session"),
        (status = 409, body = ErrorResponse, description = "the session holds no keypair"),
    ),
)]
pub(crate) async fn decapsulate(
    State(state): State<AppState>,
    RequestedSession(session): RequestedSession,
    request: Result<Json<DecapsulateRequest>, JsonRejection>,
) -> Result<impl IntoResponse, RequestError> {
    let Json(request) = request.map_err(|rejection| {
        debug!("rejected decapsulation request: {rejection}");
        RequestError::new_bad_request("malformed request body")
    })?;

    let session = session.ok_or(HandshakeError::NoKeyPair)?;
    let ciphertext = decode_bytes("ciphertext", &request.ciphertext)?;
    let shared_secret = state
        .coordinator()
        .decapsulate(session, &ciphertext)
        .await?;

    Ok((
        session_header(session),
        Json(DecapsulateResponse {
            shared_secret: encode_bytes(shared_secret.as_bytes()),
            status: DECAPSULATION_SUCCESS.to_string(),
        }),
    ))
}

fn session_response(snapshot: SessionSnapshot) -> SessionResponse {
    SessionResponse {
        session_id: snapshot.id.to_base58_string(),
        state: snapshot.state.into(),
        public_key: snapshot
            .public_key
            .map(|public_key| encode_bytes(public_key.as_bytes())),
        has_established_secret: snapshot.has_established_secret,
        pending_encapsulations: snapshot.pending_encapsulations,
        consumed_ciphertexts: snapshot.consumed_ciphertexts,
        idle_secs: snapshot.idle.as_secs(),
        pinned: snapshot.pinned,
    }
}

/// Returns the current state of the session
#[utoipa::path(
    get,
    path = "/api/quantum/session",
    tag = "Quantum",
    params(
        ("x-qs-session-id" = Option<String>, Header, description = "token of the session")
    ),
    responses(
        (status = 200, body = SessionResponse),
        (status = 400, body = ErrorResponse, description = "no (or malformed) session token"),
        (status = 404, body = ErrorResponse, description = "unknown session"),
    ),
)]
pub(crate) async fn session(
    State(state): State<AppState>,
    RequestedSession(session): RequestedSession,
) -> Result<Json<SessionResponse>, RequestError> {
    let session = session.ok_or_else(|| HandshakeError::invalid_input("no session specified"))?;
    let snapshot = state.coordinator().session(session).await?;
    Ok(Json(session_response(snapshot)))
}

/// Destroys all key material held by the session
#[utoipa::path(
    delete,
    path = "/api/quantum/session",
    tag = "Quantum",
    params(
        ("x-qs-session-id" = Option<String>, Header, description = "token of the session")
    ),
    responses(
        (status = 204, description = "the session has been reset"),
        (status = 400, body = ErrorResponse, description = "no (or malformed) session token"),
        (status = 404, body = ErrorResponse, description = "unknown session"),
    ),
)]
pub(crate) async fn reset_session(
    State(state): State<AppState>,
    RequestedSession(session): RequestedSession,
) -> Result<StatusCode, RequestError> {
    let session = session.ok_or_else(|| HandshakeError::invalid_input("no session specified"))?;
    state.coordinator().reset(session).await?;
    Ok(StatusCode::NO_CONTENT)
}
