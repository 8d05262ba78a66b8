// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::registry::SessionId;
use qs_kem::{KemCiphertext, KemKeyPair, KemPublicKey, SharedSecret};
use qs_server_requests::api::models::HandshakeState;
use sha2::{Digest, Sha256};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    KeysGenerated,
    Encapsulated,
    Completed,
}

impl SessionState {
    pub fn accepts_decapsulation(&self) -> bool {
        matches!(self, SessionState::KeysGenerated | SessionState::Encapsulated)
    }
}

impl From<SessionState> for HandshakeState {
    fn from(state: SessionState) -> Self {
        match state {
            SessionState::Empty => HandshakeState::Empty,
            SessionState::KeysGenerated => HandshakeState::KeysGenerated,
            SessionState::Encapsulated => HandshakeState::Encapsulated,
            SessionState::Completed => HandshakeState::Completed,
        }
    }
}

/// SHA-256 digest of a ciphertext, used to recognise it without holding onto the full bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CiphertextDigest([u8; 32]);

impl CiphertextDigest {
    pub fn new(ciphertext: &KemCiphertext) -> Self {
        CiphertextDigest(Sha256::digest(ciphertext.as_bytes()).into())
    }
}

struct PendingEncapsulation {
    digest: CiphertextDigest,
    shared_secret: SharedSecret,
}

/// Server side state of a single handshake.
///
/// Any secret material held here (the secret key, pending and established secrets)
/// is zeroized whenever it is replaced or the session is dropped.
pub struct Session {
    state: SessionState,
    keypair: Option<Arc<KemKeyPair>>,
    established_secret: Option<SharedSecret>,

    pending: VecDeque<PendingEncapsulation>,
    consumed: HashSet<CiphertextDigest>,
    consumed_order: VecDeque<CiphertextDigest>,

    pinned: bool,
    expired: bool,
    last_used: Instant,
}

impl Session {
    pub(crate) fn new(pinned: bool) -> Self {
        Session {
            state: SessionState::Empty,
            keypair: None,
            established_secret: None,
            pending: VecDeque::new(),
            consumed: HashSet::new(),
            consumed_order: VecDeque::new(),
            pinned,
            expired: false,
            last_used: Instant::now(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn keypair(&self) -> Option<&KemKeyPair> {
        self.keypair.as_deref()
    }

    /// Shared handle to the current keypair, usable after the session lock has been released.
    pub fn keypair_handle(&self) -> Option<Arc<KemKeyPair>> {
        self.keypair.clone()
    }

    /// Checks whether the provided handle still refers to the current keypair of this session.
    pub fn holds_keypair(&self, keypair: &Arc<KemKeyPair>) -> bool {
        self.keypair
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, keypair))
    }

    pub fn public_key(&self) -> Option<&KemPublicKey> {
        self.keypair.as_ref().map(|keypair| keypair.public_key())
    }

    pub fn established_secret(&self) -> Option<&SharedSecret> {
        self.established_secret.as_ref()
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub(crate) fn is_expired(&self) -> bool {
        self.expired
    }

    pub(crate) fn touch(&mut self) {
        self.last_used = Instant::now();
    }

    pub(crate) fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_used)
    }

    /// Replaces any previous keypair. Pending encapsulations and the established secret
    /// belonged to the old key and are dropped, but the set of consumed ciphertexts survives.
    pub fn install_keypair(&mut self, keypair: KemKeyPair) {
        self.keypair = Some(Arc::new(keypair));
        self.pending.clear();
        self.established_secret = None;
        self.state = SessionState::KeysGenerated;
    }

    /// Records the binding between a ciphertext and its secret if the encapsulation
    /// has been performed against this session's own public key.
    /// Returns whether the binding has been recorded.
    pub fn bind_encapsulation(
        &mut self,
        public_key: &KemPublicKey,
        digest: CiphertextDigest,
        shared_secret: SharedSecret,
        max_pending: usize,
    ) -> bool {
        if self.public_key() != Some(public_key) {
            return false;
        }

        while !self.pending.is_empty() && self.pending.len() >= max_pending.max(1) {
            self.pending.pop_front();
        }
        self.pending.push_back(PendingEncapsulation {
            digest,
            shared_secret,
        });
        self.state = SessionState::Encapsulated;
        true
    }

    pub fn take_pending(&mut self, digest: &CiphertextDigest) -> Option<SharedSecret> {
        let position = self.pending.iter().position(|p| &p.digest == digest)?;
        self.pending
            .remove(position)
            .map(|pending| pending.shared_secret)
    }

    pub fn pending_encapsulations(&self) -> usize {
        self.pending.len()
    }

    pub fn is_consumed(&self, digest: &CiphertextDigest) -> bool {
        self.consumed.contains(digest)
    }

    /// Remembers the ciphertext as used. Once more than `max_consumed` digests are held,
    /// the oldest ones are forgotten.
    pub fn mark_consumed(&mut self, digest: CiphertextDigest, max_consumed: usize) {
        if !self.consumed.insert(digest) {
            return;
        }
        self.consumed_order.push_back(digest);

        while self.consumed_order.len() > max_consumed.max(1) {
            if let Some(oldest) = self.consumed_order.pop_front() {
                self.consumed.remove(&oldest);
            }
        }
    }

    pub fn consumed_ciphertexts(&self) -> usize {
        self.consumed.len()
    }

    /// Establishes the shared secret. Any other encapsulations still bound to the session
    /// can no longer be decapsulated, so their secrets are dropped.
    pub fn complete(&mut self, established_secret: SharedSecret) {
        self.established_secret = Some(established_secret);
        self.pending.clear();
        self.state = SessionState::Completed;
    }

    /// Drops all key material and replay history, bringing the session back to its initial state.
    pub(crate) fn reset(&mut self) {
        self.keypair = None;
        self.established_secret = None;
        self.pending.clear();
        self.consumed.clear();
        self.consumed_order.clear();
        self.state = SessionState::Empty;
    }

    /// Marks the session as removed so that anyone still waiting on its lock backs off.
    pub(crate) fn tombstone(&mut self) {
        self.reset();
        self.expired = true;
    }

    pub(crate) fn snapshot(&self, id: SessionId, now: Instant) -> SessionSnapshot {
        SessionSnapshot {
            id,
            state: self.state,
            public_key: self.public_key().cloned(),
            has_established_secret: self.established_secret.is_some(),
            pending_encapsulations: self.pending.len(),
            consumed_ciphertexts: self.consumed.len(),
            idle: self.idle_for(now),
            pinned: self.pinned,
        }
    }
}

/// Point in time view of a session. It never carries any secret material.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub id: SessionId,
    pub state: SessionState,
    pub public_key: Option<KemPublicKey>,
    pub has_established_secret: bool,
    pub pending_encapsulations: usize,
    pub consumed_ciphertexts: usize,
    pub idle: Duration,
    pub pinned: bool,
}
