// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::http::router::{api::quantum, status};
use crate::http::state::AppState;
use axum::Router;
use qs_server_requests::api::models::{
    DecapsulateRequest, DecapsulateResponse, EncapsulateRequest, EncapsulateResponse,
    GenerateKeysResponse, HandshakeState, SessionResponse, StatusResponse,
};
use qs_server_requests::api::ErrorResponse;
use qs_server_requests::routes;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(title = "Quantum Security Handshake API"),
    paths(
        status::status,
        quantum::generate_keys,
        quantum::encapsulate,
        quantum::decapsulate,
        quantum::session,
        quantum::reset_session,
    ),
    components(schemas(
        GenerateKeysResponse,
        EncapsulateRequest,
        EncapsulateResponse,
        DecapsulateRequest,
        DecapsulateResponse,
        SessionResponse,
        HandshakeState,
        StatusResponse,
        ErrorResponse,
    ))
)]
pub(crate) struct ApiDoc;

pub(crate) fn route() -> Router<AppState> {
    // provide absolute path to the openapi.json
    let config = utoipa_swagger_ui::Config::from("/api/v1/api-docs/openapi.json");
    SwaggerUi::new(routes::api::v1::SWAGGER)
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .config(config)
        .into()
}
