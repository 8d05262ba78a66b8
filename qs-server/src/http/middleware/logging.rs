// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use axum::extract::Request;
use axum::http::header::{HOST, USER_AGENT};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::IntoResponse;
use std::time::Instant;
use tracing::info;

/// Simple logger for requests
pub async fn logger(req: Request, next: Next) -> impl IntoResponse {
    let method = req.method().to_string();
    let uri = req.uri().to_string();
    let agent = header_map(
        req.headers().get(USER_AGENT),
        "Unknown User Agent".to_string(),
    );
    let host = header_map(req.headers().get(HOST), "Unknown Host".to_string());

    let start = Instant::now();
    let res = next.run(req).await;
    let status = res.status();
    let elapsed = start.elapsed();

    info!("[{host}] {method} '{uri}': {status} ({elapsed:?}) / agent: {agent}");

    res
}

fn header_map(header: Option<&HeaderValue>, msg: String) -> String {
    header
        .map(|x| x.to_str().unwrap_or(&msg).to_string())
        .unwrap_or(msg)
}
