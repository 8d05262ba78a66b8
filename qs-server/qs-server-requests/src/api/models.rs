// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Handshake progress of a single session.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum HandshakeState {
    Empty,
    KeysGenerated,
    Encapsulated,
    Completed,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct GenerateKeysResponse {
    /// Base64-encoded encapsulation key. The matching secret key never leaves the server.
    pub public_key: String,

    /// Token identifying the session holding the secret key.
    pub session_id: String,

    #[cfg_attr(feature = "openapi", schema(example = "ML-KEM-1024"))]
    pub algorithm: String,

    pub message: String,
}

/// Structured variant of the encapsulation request body.
/// The endpoint also accepts the bare base64 key, either as plain text or as a json string.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EncapsulateRequest {
    /// Base64-encoded public key to encapsulate against.
    /// If omitted, the key held by the caller's session is used.
    #[serde(default)]
    pub public_key: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct EncapsulateResponse {
    /// Base64-encoded ciphertext.
    pub ciphertext: String,

    /// Base64-encoded encapsulated secret, returned for demonstration purposes only.
    pub shared_secret: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DecapsulateRequest {
    /// Base64-encoded ciphertext.
    pub ciphertext: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DecapsulateResponse {
    /// Base64-encoded decapsulated secret.
    pub shared_secret: String,

    pub status: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct SessionResponse {
    pub session_id: String,

    pub state: HandshakeState,

    /// Base64-encoded public key of the current keypair, if any.
    pub public_key: Option<String>,

    pub has_established_secret: bool,

    pub pending_encapsulations: usize,

    pub consumed_ciphertexts: usize,

    /// Seconds since the session has last been used.
    pub idle_secs: u64,

    /// Whether this is the implicit, per-process session that is never removed.
    pub pinned: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct StatusResponse {
    #[cfg_attr(feature = "openapi", schema(example = "online"))]
    pub status: String,

    pub system: String,

    pub algorithms: Vec<String>,

    pub security_level: String,
}
