// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::http::middleware::logging;
use crate::http::state::AppState;
use axum::routing::get;
use axum::Router;
use qs_server_requests::routes;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod status;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(routes::STATUS, get(status::status))
        .nest(routes::API, api::routes())
        // the browser ui is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(logging::logger))
        .with_state(state)
}
