// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

//! ML-KEM-1024 (FIPS 203, NIST security category 5) adapter.

use crate::error::KemError;
use crate::types::{KemCiphertext, KemKeyPair, KemPublicKey, KemSecretKey, SharedSecret};
use crate::{Kem, KemParameters};
use fips203::ml_kem_1024;
use fips203::traits::{Decaps, Encaps, KeyGen, SerDes};
use rand::rngs::OsRng;
use zeroize::Zeroizing;

pub const PUBLIC_KEY_LENGTH: usize = 1568;
pub const SECRET_KEY_LENGTH: usize = 3168;
pub const CIPHERTEXT_LENGTH: usize = 1568;
pub const SHARED_SECRET_LENGTH: usize = 32;

pub const ML_KEM_1024_PARAMETERS: KemParameters = KemParameters {
    public_key_len: PUBLIC_KEY_LENGTH,
    secret_key_len: SECRET_KEY_LENGTH,
    ciphertext_len: CIPHERTEXT_LENGTH,
    shared_secret_len: SHARED_SECRET_LENGTH,
    security_category: 5,
};

fn invalid_length(item: &'static str, expected: usize, actual: usize) -> KemError {
    KemError::InvalidLength {
        item,
        expected,
        actual,
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct MlKem1024;

impl MlKem1024 {
    pub const NAME: &'static str = "ML-KEM-1024";

    pub fn new() -> Self {
        MlKem1024
    }
}

impl Kem for MlKem1024 {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn parameters(&self) -> KemParameters {
        ML_KEM_1024_PARAMETERS
    }

    fn keygen(&self) -> Result<KemKeyPair, KemError> {
        let (ek, dk) = ml_kem_1024::KG::try_keygen_with_rng(&mut OsRng).map_err(|err| {
            KemError::KeyGeneration {
                reason: err.to_string(),
            }
        })?;

        let dk_bytes = Zeroizing::new(dk.into_bytes());
        Ok(KemKeyPair::new(
            KemPublicKey::from_bytes(ek.into_bytes().to_vec()),
            KemSecretKey::from_bytes(dk_bytes.to_vec()),
        ))
    }

    fn encapsulate(
        &self,
        public_key: &KemPublicKey,
    ) -> Result<(KemCiphertext, SharedSecret), KemError> {
        let ek_bytes = public_key
            .as_bytes()
            .try_into()
            .map_err(|_| invalid_length("public key", PUBLIC_KEY_LENGTH, public_key.len()))?;

        // performs the FIPS 203 modulus check on the encoded key
        let ek = ml_kem_1024::EncapsKey::try_from_bytes(ek_bytes).map_err(|err| {
            KemError::MalformedPublicKey {
                reason: err.to_string(),
            }
        })?;

        let (ssk, ct) = ek
            .try_encaps_with_rng(&mut OsRng)
            .map_err(|err| KemError::Encapsulation {
                reason: err.to_string(),
            })?;

        let ss_bytes = Zeroizing::new(ssk.into_bytes());
        Ok((
            KemCiphertext::from_bytes(ct.into_bytes().to_vec()),
            SharedSecret::from_bytes(ss_bytes.to_vec()),
        ))
    }

    fn decapsulate(
        &self,
        secret_key: &KemSecretKey,
        ciphertext: &KemCiphertext,
    ) -> Result<SharedSecret, KemError> {
        let dk_bytes: Zeroizing<[u8; SECRET_KEY_LENGTH]> = Zeroizing::new(
            secret_key
                .as_bytes()
                .try_into()
                .map_err(|_| invalid_length("secret key", SECRET_KEY_LENGTH, secret_key.len()))?,
        );
        let ct_bytes: [u8; CIPHERTEXT_LENGTH] = ciphertext
            .as_bytes()
            .try_into()
            .map_err(|_| invalid_length("ciphertext", CIPHERTEXT_LENGTH, ciphertext.len()))?;

        let dk = ml_kem_1024::DecapsKey::try_from_bytes(*dk_bytes).map_err(|err| {
            KemError::Decapsulation {
                reason: err.to_string(),
            }
        })?;
        let ct = ml_kem_1024::CipherText::try_from_bytes(ct_bytes).map_err(|err| {
            KemError::Decapsulation {
                reason: err.to_string(),
            }
        })?;

        // an invalid (but well-sized) ciphertext results in the implicit rejection secret,
        // never in an error
        let ssk = dk.try_decaps(&ct).map_err(|err| KemError::Decapsulation {
            reason: err.to_string(),
        })?;

        let ss_bytes = Zeroizing::new(ssk.into_bytes());
        Ok(SharedSecret::from_bytes(ss_bytes.to_vec()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::RngCore;

    fn random_ciphertext() -> KemCiphertext {
        let mut bytes = vec![0u8; CIPHERTEXT_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        KemCiphertext::from_bytes(bytes)
    }

    #[test]
    fn produces_expected_lengths() {
        let kem = MlKem1024::new();
        let keypair = kem.keygen().unwrap();
        assert_eq!(keypair.public_key().len(), PUBLIC_KEY_LENGTH);
        assert_eq!(keypair.secret_key().len(), SECRET_KEY_LENGTH);

        let (ciphertext, secret) = kem.encapsulate(keypair.public_key()).unwrap();
        assert_eq!(ciphertext.len(), CIPHERTEXT_LENGTH);
        assert_eq!(secret.len(), SHARED_SECRET_LENGTH);
    }

    #[test]
    fn decapsulation_recovers_encapsulated_secret() {
        let kem = MlKem1024::new();
        let keypair = kem.keygen().unwrap();

        for _ in 0..8 {
            let (ciphertext, secret) = kem.encapsulate(keypair.public_key()).unwrap();
            let recovered = kem.decapsulate(keypair.secret_key(), &ciphertext).unwrap();
            assert_eq!(secret, recovered);
        }
    }

    #[test]
    fn encapsulation_is_probabilistic() {
        let kem = MlKem1024::new();
        let keypair = kem.keygen().unwrap();

        let (ct1, ss1) = kem.encapsulate(keypair.public_key()).unwrap();
        let (ct2, ss2) = kem.encapsulate(keypair.public_key()).unwrap();
        assert_ne!(ct1, ct2);
        assert_ne!(ss1, ss2);
    }

    #[test]
    fn implicit_rejection_is_deterministic() {
        let kem = MlKem1024::new();
        let keypair = kem.keygen().unwrap();
        let foreign = random_ciphertext();

        let first = kem.decapsulate(keypair.secret_key(), &foreign).unwrap();
        let second = kem.decapsulate(keypair.secret_key(), &foreign).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), SHARED_SECRET_LENGTH);

        // and it differs from whatever a legitimate encapsulation produced
        let (_, legitimate) = kem.encapsulate(keypair.public_key()).unwrap();
        assert_ne!(first, legitimate);
    }

    #[test]
    fn ciphertext_under_different_key_does_not_decapsulate_to_same_secret() {
        let kem = MlKem1024::new();
        let alice = kem.keygen().unwrap();
        let bob = kem.keygen().unwrap();

        let (ciphertext, secret) = kem.encapsulate(alice.public_key()).unwrap();
        let wrong = kem.decapsulate(bob.secret_key(), &ciphertext).unwrap();
        assert_ne!(secret, wrong);
    }

    #[test]
    fn rejects_wrongly_sized_inputs() {
        let kem = MlKem1024::new();
        let keypair = kem.keygen().unwrap();

        let short_key = KemPublicKey::from_bytes(vec![0u8; PUBLIC_KEY_LENGTH - 1]);
        assert!(matches!(
            kem.encapsulate(&short_key),
            Err(KemError::InvalidLength { .. })
        ));

        let short_ct = KemCiphertext::from_bytes(vec![0u8; 10]);
        assert!(matches!(
            kem.decapsulate(keypair.secret_key(), &short_ct),
            Err(KemError::InvalidLength { .. })
        ));

        assert!(kem.parse_public_key(&[0u8; 12]).is_err());
        assert!(kem.parse_ciphertext(&[0u8; CIPHERTEXT_LENGTH + 1]).is_err());
        assert!(kem.parse_ciphertext(&[0u8; CIPHERTEXT_LENGTH]).is_ok());
    }

    #[test]
    fn rejects_public_key_failing_modulus_check() {
        let kem = MlKem1024::new();
        let bogus = KemPublicKey::from_bytes(vec![0xFF; PUBLIC_KEY_LENGTH]);
        let err = kem.encapsulate(&bogus).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn independent_keypairs_differ() {
        let kem = MlKem1024::new();
        let a = kem.keygen().unwrap();
        let b = kem.keygen().unwrap();
        assert_ne!(a.public_key(), b.public_key());
        assert_ne!(a.secret_key().as_bytes(), b.secret_key().as_bytes());
    }
}
