// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! Key encapsulation primitives.
//!
//! Everything outside of this crate treats keys, ciphertexts and shared secrets as opaque,
//! fixed-length byte strings. The algorithm specific layouts live exclusively in the concrete
//! adapters (currently only [`MlKem1024`]), so swapping the scheme means providing another
//! implementation of [`Kem`] together with its [`KemParameters`].

pub mod error;
pub mod ml_kem;
pub mod types;

pub use error::KemError;
pub use ml_kem::MlKem1024;
pub use types::{KemCiphertext, KemKeyPair, KemPublicKey, KemSecretKey, SharedSecret};

/// Byte lengths (and the claimed NIST security category) of a particular KEM parameter set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KemParameters {
    pub public_key_len: usize,
    pub secret_key_len: usize,
    pub ciphertext_len: usize,
    pub shared_secret_len: usize,
    pub security_category: u8,
}

/// Capability interface of a key encapsulation mechanism.
///
/// Implementations must be IND-CCA2 secure and perform implicit rejection, i.e. decapsulating a
/// correctly sized but invalid ciphertext has to return a deterministic pseudo-random secret
/// rather than an error.
pub trait Kem: Send + Sync + 'static {
    /// Human readable name of the scheme and parameter set, e.g. `ML-KEM-1024`.
    fn name(&self) -> &'static str;

    fn parameters(&self) -> KemParameters;

    fn keygen(&self) -> Result<KemKeyPair, KemError>;

    fn encapsulate(
        &self,
        public_key: &KemPublicKey,
    ) -> Result<(KemCiphertext, SharedSecret), KemError>;

    fn decapsulate(
        &self,
        secret_key: &KemSecretKey,
        ciphertext: &KemCiphertext,
    ) -> Result<SharedSecret, KemError>;

    /// Length-checks raw bytes before treating them as a public key of this scheme.
    fn parse_public_key(&self, bytes: &[u8]) -> Result<KemPublicKey, KemError> {
        let expected = self.parameters().public_key_len;
        if bytes.len() != expected {
            return Err(KemError::InvalidLength {
                item: "public key",
                expected,
                actual: bytes.len(),
            });
        }
        Ok(KemPublicKey::from_bytes(bytes))
    }

    /// Length-checks raw bytes before treating them as a ciphertext of this scheme.
    fn parse_ciphertext(&self, bytes: &[u8]) -> Result<KemCiphertext, KemError> {
        let expected = self.parameters().ciphertext_len;
        if bytes.len() != expected {
            return Err(KemError::InvalidLength {
                item: "ciphertext",
                expected,
                actual: bytes.len(),
            });
        }
        Ok(KemCiphertext::from_bytes(bytes))
    }
}
