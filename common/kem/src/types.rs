// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use std::fmt::{self, Debug, Formatter};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Encapsulation key. Public by definition, safe to share and log.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KemPublicKey(Vec<u8>);

impl KemPublicKey {
    /// Wraps raw bytes without any validation, prefer [`Kem::parse_public_key`](crate::Kem::parse_public_key).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        KemPublicKey(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for KemPublicKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "KemPublicKey({} bytes)", self.0.len())
    }
}

/// Decapsulation key. It deliberately implements neither `Clone` nor any serialization.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KemSecretKey(Vec<u8>);

impl KemSecretKey {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        KemSecretKey(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for KemSecretKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("KemSecretKey(<redacted>)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
pub struct KemCiphertext(Vec<u8>);

impl KemCiphertext {
    /// Wraps raw bytes without any validation, prefer [`Kem::parse_ciphertext`](crate::Kem::parse_ciphertext).
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        KemCiphertext(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for KemCiphertext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "KemCiphertext({} bytes)", self.0.len())
    }
}

/// Secret established by a successful encapsulation/decapsulation pair.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret(Vec<u8>);

impl SharedSecret {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        SharedSecret(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ConstantTimeEq for SharedSecret {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.0.as_slice().ct_eq(other.0.as_slice())
    }
}

impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for SharedSecret {}

impl Debug for SharedSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SharedSecret(<redacted>)")
    }
}

pub struct KemKeyPair {
    public_key: KemPublicKey,
    secret_key: KemSecretKey,
}

impl KemKeyPair {
    pub fn new(public_key: KemPublicKey, secret_key: KemSecretKey) -> Self {
        KemKeyPair {
            public_key,
            secret_key,
        }
    }

    pub fn public_key(&self) -> &KemPublicKey {
        &self.public_key
    }

    pub fn secret_key(&self) -> &KemSecretKey {
        &self.secret_key
    }
}

impl Debug for KemKeyPair {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("KemKeyPair")
            .field("public_key", &self.public_key)
            .field("secret_key", &self.secret_key)
            .finish()
    }
}
