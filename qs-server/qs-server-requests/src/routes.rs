// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub const STATUS: &str = "/status";
pub const API: &str = "/api";

pub mod api {
    pub const QUANTUM: &str = "/quantum";
    pub const V1: &str = "/v1";

    pub mod quantum {
        pub const KEYS: &str = "/keys";
        pub const ENCAPSULATE: &str = "/encapsulate";
        pub const DECAPSULATE: &str = "/decapsulate";
        pub const SESSION: &str = "/session";
    }

    pub mod v1 {
        pub const SWAGGER: &str = "/swagger";
    }
}

/// Absolute path of the given quantum endpoint, e.g. `/api/quantum/keys`.
pub fn quantum_route(endpoint: &str) -> String {
    format!("{API}{}{endpoint}", api::QUANTUM)
}
