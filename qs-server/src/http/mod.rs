// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::QsServerError;
use axum::Router;
use qs_task::ShutdownToken;
use std::net::SocketAddr;
use tracing::info;

pub mod helpers;
pub mod middleware;
pub mod router;
pub mod state;
pub mod types;

pub struct HttpServer {
    bind_address: SocketAddr,
    router: Router,
    shutdown_token: ShutdownToken,
}

impl HttpServer {
    pub fn new(bind_address: SocketAddr, router: Router, shutdown_token: ShutdownToken) -> Self {
        HttpServer {
            bind_address,
            router,
            shutdown_token,
        }
    }

    pub async fn run(self) -> Result<(), QsServerError> {
        let address = self.bind_address;
        info!("starting the http server on http://{address}");

        let listener = tokio::net::TcpListener::bind(address)
            .await
            .map_err(|source| QsServerError::SocketBindFailure { address, source })?;

        let shutdown_token = self.shutdown_token;
        axum::serve(
            listener,
            self.router
                .into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async move { shutdown_token.cancelled().await })
        .await
        .map_err(|source| QsServerError::HttpServerFailure { source })
    }
}
