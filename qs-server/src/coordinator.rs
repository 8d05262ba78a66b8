// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::error::HandshakeError;
use crate::registry::{CiphertextDigest, Session, SessionId, SessionRegistry, SessionSnapshot};
use qs_kem::{Kem, KemCiphertext, KemError, KemKeyPair, KemPublicKey, SharedSecret};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use subtle::ConstantTimeEq;
use tracing::{debug, error, info, warn};

pub struct GeneratedKeys {
    pub session_id: SessionId,
    pub public_key: KemPublicKey,
}

pub struct Encapsulation {
    pub ciphertext: KemCiphertext,
    pub shared_secret: SharedSecret,

    /// Whether the ciphertext has been bound to the session, so that its later decapsulation
    /// gets checked against the encapsulated secret.
    pub bound_to_session: bool,
}

/// Drives the keygen -> encapsulate -> decapsulate handshake on top of the session registry.
#[derive(Clone)]
pub struct HandshakeCoordinator {
    kem: Arc<dyn Kem>,
    registry: SessionRegistry,
    request_timeout: Duration,
}

impl HandshakeCoordinator {
    pub fn new(kem: Arc<dyn Kem>, registry: SessionRegistry, request_timeout: Duration) -> Self {
        HandshakeCoordinator {
            kem,
            registry,
            request_timeout,
        }
    }

    pub fn kem(&self) -> &dyn Kem {
        self.kem.as_ref()
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    async fn bounded<F, T>(&self, operation: &'static str, fut: F) -> Result<T, HandshakeError>
    where
        F: Future<Output = Result<T, HandshakeError>>,
    {
        let timeout = self.request_timeout;
        tokio::time::timeout(timeout, fut).await.map_err(|_| {
            warn!("{operation} did not complete within {timeout:?}");
            HandshakeError::Timeout { timeout }
        })?
    }

    async fn run_kem<F, T>(&self, op: F) -> Result<T, HandshakeError>
    where
        F: FnOnce(&dyn Kem) -> Result<T, KemError> + Send + 'static,
        T: Send + 'static,
    {
        let kem = self.kem.clone();
        tokio::task::spawn_blocking(move || op(kem.as_ref()))
            .await
            .map_err(|err| {
                error!("the kem worker did not complete: {err}");
                HandshakeError::primitive_failure(err.to_string())
            })?
            .map_err(Into::into)
    }

    /// Generates a fresh keypair for the session, minting a new session if none was specified.
    /// Any previous keypair of that session is destroyed.
    pub async fn generate_keys(
        &self,
        session: Option<SessionId>,
    ) -> Result<GeneratedKeys, HandshakeError> {
        self.bounded("key generation", async move {
            if let Some(id) = session {
                // fail early before doing any expensive work
                if !self.registry.contains(id) {
                    return Err(HandshakeError::NotFound { session_id: id });
                }
            }

            let keypair = self.run_kem(|kem| kem.keygen()).await?;
            let public_key = keypair.public_key().clone();

            let session_id = match session {
                Some(id) => id,
                None => self.registry.create()?,
            };

            self.registry
                .update(session_id, move |session| {
                    session.install_keypair(keypair);
                    Ok(())
                })
                .await?;

            info!("generated new {} keypair for session {session_id}", self.kem.name());
            Ok(GeneratedKeys {
                session_id,
                public_key,
            })
        })
        .await
    }

    /// Encapsulates a fresh secret against the provided public key.
    ///
    /// If the key belongs to the specified session, the resulting ciphertext is bound to it.
    /// Otherwise this is a one-shot encapsulation that does not touch any session state.
    pub async fn encapsulate(
        &self,
        session: Option<SessionId>,
        public_key: &[u8],
    ) -> Result<Encapsulation, HandshakeError> {
        let public_key = self.kem.parse_public_key(public_key)?;
        self.bounded("encapsulation", self.encapsulate_and_bind(session, public_key))
            .await
    }

    /// Encapsulates a fresh secret against the public key held by the session itself.
    pub async fn encapsulate_to_session(
        &self,
        session_id: SessionId,
    ) -> Result<Encapsulation, HandshakeError> {
        self.bounded("encapsulation", async move {
            let public_key = self
                .registry
                .update(session_id, |session| {
                    session.public_key().cloned().ok_or(HandshakeError::NoKeyPair)
                })
                .await?;
            self.encapsulate_and_bind(Some(session_id), public_key)
                .await
        })
        .await
    }

    async fn encapsulate_and_bind(
        &self,
        session: Option<SessionId>,
        public_key: KemPublicKey,
    ) -> Result<Encapsulation, HandshakeError> {
        let encapsulation_key = public_key.clone();
        let (ciphertext, shared_secret) = self
            .run_kem(move |kem| kem.encapsulate(&encapsulation_key))
            .await?;

        let Some(session_id) = session else {
            return Ok(Encapsulation {
                ciphertext,
                shared_secret,
                bound_to_session: false,
            });
        };

        let digest = CiphertextDigest::new(&ciphertext);
        let binding = shared_secret.clone();
        let max_pending = self.registry.config().max_pending_encapsulations;

        let bound_to_session = match self
            .registry
            .update(session_id, move |session| {
                Ok(session.bind_encapsulation(&public_key, digest, binding, max_pending))
            })
            .await
        {
            Ok(bound) => bound,
            // encapsulation is stateless with respect to sessions we know nothing about
            Err(HandshakeError::NotFound { .. }) => false,
            Err(HandshakeError::InvalidState { reason }) => {
                debug!("could not bind the encapsulation to session {session_id}: {reason}");
                false
            }
            Err(err) => return Err(err),
        };

        if bound_to_session {
            debug!("bound new encapsulation to session {session_id}");
        } else {
            debug!("performed one-shot encapsulation against a foreign public key");
        }

        Ok(Encapsulation {
            ciphertext,
            shared_secret,
            bound_to_session,
        })
    }

    /// Recovers the shared secret from the ciphertext using the session's secret key.
    ///
    /// Ciphertexts that have not been produced against this session's key are not an error:
    /// they decapsulate to a pseudo-random value, exactly as the underlying KEM dictates.
    ///
    /// The session lock is not held during the decapsulation itself and the outcome is only
    /// committed to the session if the request is still alive once it has been computed.
    pub async fn decapsulate(
        &self,
        session_id: SessionId,
        ciphertext: &[u8],
    ) -> Result<SharedSecret, HandshakeError> {
        let ciphertext = self.kem.parse_ciphertext(ciphertext)?;
        let digest = CiphertextDigest::new(&ciphertext);
        let max_consumed = self.registry.config().max_consumed_ciphertexts;

        self.bounded("decapsulation", async move {
            let keypair = self
                .registry
                .update(session_id, |session| {
                    ensure_decapsulable(session_id, session, &digest)?;
                    session.keypair_handle().ok_or(HandshakeError::NoKeyPair)
                })
                .await?;

            let decapsulation_key = keypair.clone();
            let shared_secret = self
                .run_kem(move |kem| kem.decapsulate(decapsulation_key.secret_key(), &ciphertext))
                .await?;

            self.registry
                .update(session_id, |session| {
                    commit_decapsulation(
                        session_id,
                        session,
                        &keypair,
                        digest,
                        shared_secret,
                        max_consumed,
                    )
                })
                .await
        })
        .await
    }

    pub async fn session(&self, session_id: SessionId) -> Result<SessionSnapshot, HandshakeError> {
        self.bounded("session lookup", self.registry.get(session_id))
            .await
    }

    /// Destroys all key material of the session.
    pub async fn reset(&self, session_id: SessionId) -> Result<(), HandshakeError> {
        self.bounded("session reset", self.registry.expire(session_id))
            .await?;
        info!("session {session_id} has been reset");
        Ok(())
    }
}

fn ensure_decapsulable(
    session_id: SessionId,
    session: &Session,
    digest: &CiphertextDigest,
) -> Result<(), HandshakeError> {
    if !session.state().accepts_decapsulation() || session.keypair().is_none() {
        return Err(HandshakeError::NoKeyPair);
    }
    if session.is_consumed(digest) {
        return Err(HandshakeError::CiphertextReplayed { session_id });
    }
    Ok(())
}

fn commit_decapsulation(
    session_id: SessionId,
    session: &mut Session,
    keypair: &Arc<KemKeyPair>,
    digest: CiphertextDigest,
    shared_secret: SharedSecret,
    max_consumed: usize,
) -> Result<SharedSecret, HandshakeError> {
    // things might have moved on while we were decapsulating
    ensure_decapsulable(session_id, session, &digest)?;
    if !session.holds_keypair(keypair) {
        return Err(HandshakeError::InvalidState {
            reason: format!("session {session_id} got re-keyed during decapsulation"),
        });
    }

    session.mark_consumed(digest, max_consumed);

    if let Some(expected) = session.take_pending(&digest) {
        if !bool::from(expected.ct_eq(&shared_secret)) {
            error!("decapsulated secret does not match the encapsulated one in session {session_id}");
            return Err(HandshakeError::primitive_failure(
                "decapsulated secret does not match the encapsulated one",
            ));
        }
    }

    session.complete(shared_secret.clone());
    debug!("session {session_id} has established its shared secret");
    Ok(shared_secret)
}
