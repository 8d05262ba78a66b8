// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::registry::SessionId;
use qs_kem::KemError;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HandshakeError {
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("the session does not hold a keypair")]
    NoKeyPair,

    #[error("the session can't currently be modified: {reason}")]
    InvalidState { reason: String },

    #[error("the kem primitive has failed: {reason}")]
    PrimitiveFailure { reason: String },

    #[error("session {session_id} does not exist")]
    NotFound { session_id: SessionId },

    #[error("this ciphertext has already been decapsulated within session {session_id}")]
    CiphertextReplayed { session_id: SessionId },

    #[error("reached the limit of {max} concurrent sessions")]
    TooManySessions { max: usize },

    #[error("the operation did not complete within {timeout:?}")]
    Timeout { timeout: Duration },
}

impl HandshakeError {
    pub fn invalid_input<S: Into<String>>(reason: S) -> Self {
        HandshakeError::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn primitive_failure<S: Into<String>>(reason: S) -> Self {
        HandshakeError::PrimitiveFailure {
            reason: reason.into(),
        }
    }
}

impl From<KemError> for HandshakeError {
    fn from(err: KemError) -> Self {
        if err.is_input_error() {
            HandshakeError::invalid_input(err.to_string())
        } else {
            HandshakeError::primitive_failure(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum QsServerError {
    #[error("failed to bind the http server to {address}: {source}")]
    SocketBindFailure {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("the http server has failed: {source}")]
    HttpServerFailure {
        #[source]
        source: io::Error,
    },

    #[error("failed to load the env file at '{path}': {source}")]
    EnvFileLoadFailure {
        path: String,
        #[source]
        source: dotenvy::Error,
    },
}
