// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Post-quantum KEM handshake service.
//!
//! Clients generate a keypair held by a server-side session, encapsulate a secret against
//! its public key and finally have the server decapsulate the ciphertext back into the
//! very same secret. The secret key never leaves the [`registry::SessionRegistry`].

pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod registry;
pub mod tasks;

pub use config::Config;
pub use coordinator::HandshakeCoordinator;
pub use error::{HandshakeError, QsServerError};
pub use registry::{SessionId, SessionRegistry};

use crate::http::state::AppState;
use qs_kem::Kem;
use std::sync::Arc;

/// Wires the registry and the coordinator together into the state shared by all http handlers.
pub fn build_app_state(config: &Config, kem: Arc<dyn Kem>) -> AppState {
    let registry = SessionRegistry::new(config.registry);
    let coordinator = HandshakeCoordinator::new(kem, registry, config.request_timeout);
    let implicit_session = config.implicit_session.then(SessionId::random);

    AppState::new(coordinator, implicit_session)
}
