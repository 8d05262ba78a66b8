// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::http::state::AppState;
use axum::extract::State;
use axum::Json;
use qs_server_requests::api::models::StatusResponse;

pub(crate) const SYSTEM_NAME: &str = "Quantum Security Handshake Service";

fn security_level(category: u8) -> String {
    let equivalent = match category {
        1 | 2 => "AES-128",
        3 | 4 => "AES-192",
        _ => "AES-256",
    };
    format!("NIST Level {category} ({equivalent} equivalent)")
}

/// Returns basic information about the service and the algorithms it uses
#[utoipa::path(
    get,
    path = "/status",
    tag = "Status",
    responses(
        (status = 200, body = StatusResponse)
    ),
)]
pub(crate) async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let kem = state.coordinator().kem();

    Json(StatusResponse {
        status: "online".to_string(),
        system: SYSTEM_NAME.to_string(),
        algorithms: vec![kem.name().to_string()],
        security_level: security_level(kem.parameters().security_category),
    })
}
