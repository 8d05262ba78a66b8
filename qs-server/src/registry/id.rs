// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt::{self, Debug, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub const SESSION_ID_LENGTH: usize = 32;

#[derive(Debug, Error)]
pub enum SessionIdParseError {
    #[error("the session id is not valid base58: {0}")]
    MalformedEncoding(#[from] bs58::decode::Error),

    #[error("the session id has invalid length: expected {SESSION_ID_LENGTH} bytes, got {0}")]
    InvalidLength(usize),
}

/// Unguessable session token. Possession of it is the only access control to the session.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId([u8; SESSION_ID_LENGTH]);

impl SessionId {
    pub fn random() -> Self {
        let mut bytes = [0u8; SESSION_ID_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        SessionId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SESSION_ID_LENGTH] {
        &self.0
    }

    pub fn to_base58_string(&self) -> String {
        bs58::encode(&self.0).into_string()
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58_string())
    }
}

impl Debug for SessionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "SessionId({self})")
    }
}

impl FromStr for SessionId {
    type Err = SessionIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let decoded = bs58::decode(s.trim()).into_vec()?;
        let bytes = decoded
            .as_slice()
            .try_into()
            .map_err(|_| SessionIdParseError::InvalidLength(decoded.len()))?;
        Ok(SessionId(bytes))
    }
}
