// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

#[derive(Debug, Error)]
pub enum KemError {
    #[error("invalid {item} length: expected {expected} bytes, got {actual}")]
    InvalidLength {
        item: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("the provided public key is not a valid encapsulation key: {reason}")]
    MalformedPublicKey { reason: String },

    #[error("key generation failed: {reason}")]
    KeyGeneration { reason: String },

    #[error("encapsulation failed: {reason}")]
    Encapsulation { reason: String },

    #[error("decapsulation failed: {reason}")]
    Decapsulation { reason: String },
}

impl KemError {
    /// Whether the error was caused by caller supplied data rather than the primitive itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            KemError::InvalidLength { .. } | KemError::MalformedPublicKey { .. }
        )
    }
}
