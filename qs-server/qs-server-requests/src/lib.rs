// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod api;
pub mod routes;

/// Header carrying the opaque session token in both requests and responses.
pub const SESSION_ID_HEADER: &str = "x-qs-session-id";
