// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::http::state::AppState;
use axum::Router;
use qs_server_requests::routes;

pub mod openapi;
pub mod quantum;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .nest(routes::api::QUANTUM, quantum::routes())
        .nest(routes::api::V1, openapi::route())
}
