// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::config::RegistryConfig;
use crate::error::HandshakeError;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::time::Instant;
use tracing::{debug, trace};

pub use id::{SessionId, SessionIdParseError};
pub use session::{CiphertextDigest, Session, SessionSnapshot, SessionState};

pub mod id;
pub mod session;

type SessionHandle = Arc<Mutex<Session>>;

/// Concurrency-safe mapping of session ids to their handshake state.
///
/// The map itself is sharded and only ever held for the duration of a lookup, while each entry
/// carries its own async lock serialising every mutation of that particular session.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<SessionRegistryInner>,
}

struct SessionRegistryInner {
    sessions: DashMap<SessionId, SessionHandle>,

    /// Number of minted, i.e. non-pinned, sessions currently in the map.
    minted: AtomicUsize,
    config: RegistryConfig,
}

impl SessionRegistry {
    pub fn new(config: RegistryConfig) -> Self {
        SessionRegistry {
            inner: Arc::new(SessionRegistryInner {
                sessions: DashMap::new(),
                minted: AtomicUsize::new(0),
                config,
            }),
        }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.inner.config
    }

    pub fn len(&self) -> usize {
        self.inner.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.sessions.is_empty()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.inner.sessions.contains_key(&id)
    }

    fn reserve_slot(&self) -> Result<(), HandshakeError> {
        let max = self.inner.config.max_sessions;
        self.inner
            .minted
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |minted| {
                (minted < max).then_some(minted + 1)
            })
            .map(|_| ())
            .map_err(|_| HandshakeError::TooManySessions { max })
    }

    fn release_slot(&self) {
        self.inner.minted.fetch_sub(1, Ordering::AcqRel);
    }

    /// Mints a fresh, empty session.
    pub fn create(&self) -> Result<SessionId, HandshakeError> {
        self.reserve_slot()?;

        loop {
            let id = SessionId::random();
            if let Entry::Vacant(entry) = self.inner.sessions.entry(id) {
                entry.insert(Arc::new(Mutex::new(Session::new(false))));
                debug!("created session {id}");
                return Ok(id);
            }
        }
    }

    /// Inserts a session that is never removed from the registry, only reset.
    /// If the session already exists, it is left untouched.
    pub fn create_pinned(&self, id: SessionId) {
        self.inner
            .sessions
            .entry(id)
            .or_insert_with(|| Arc::new(Mutex::new(Session::new(true))));
    }

    fn handle(&self, id: SessionId) -> Result<SessionHandle, HandshakeError> {
        // clone the handle out so that the shard lock is released immediately
        self.inner
            .sessions
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(HandshakeError::NotFound { session_id: id })
    }

    pub(crate) async fn lock(
        &self,
        id: SessionId,
    ) -> Result<OwnedMutexGuard<Session>, HandshakeError> {
        let handle = self.handle(id)?;
        let timeout = self.inner.config.lock_timeout;

        let guard = tokio::time::timeout(timeout, handle.lock_owned())
            .await
            .map_err(|_| HandshakeError::InvalidState {
                reason: format!("session {id} is busy"),
            })?;

        // the session might have been expired while we were waiting for the lock
        if guard.is_expired() {
            return Err(HandshakeError::NotFound { session_id: id });
        }
        Ok(guard)
    }

    pub async fn get(&self, id: SessionId) -> Result<SessionSnapshot, HandshakeError> {
        let guard = self.lock(id).await?;
        Ok(guard.snapshot(id, Instant::now()))
    }

    /// Atomically applies the mutator to the session.
    ///
    /// The mutator runs synchronously right after the lock has been acquired, so a caller
    /// abandoning the returned future either sees the whole mutation applied or none of it.
    /// It must not perform any expensive work such as KEM computation.
    pub async fn update<F, T>(&self, id: SessionId, mutator: F) -> Result<T, HandshakeError>
    where
        F: FnOnce(&mut Session) -> Result<T, HandshakeError>,
    {
        let mut guard = self.lock(id).await?;
        guard.touch();
        mutator(&mut guard)
    }

    /// Explicitly removes the session and destroys its key material.
    /// Pinned sessions get reset instead.
    pub async fn expire(&self, id: SessionId) -> Result<(), HandshakeError> {
        let handle = self.handle(id)?;
        let mut guard = self.lock(id).await?;

        if guard.is_pinned() {
            guard.reset();
            guard.touch();
            debug!("reset pinned session {id}");
            return Ok(());
        }

        guard.tombstone();
        drop(guard);

        if self
            .inner
            .sessions
            .remove_if(&id, |_, existing| Arc::ptr_eq(existing, &handle))
            .is_some()
        {
            self.release_slot();
        }
        debug!("expired session {id}");
        Ok(())
    }

    /// Removes all sessions that have been idle for longer than the configured ttl.
    /// Sessions that are currently in use are skipped and will be looked at during the next sweep.
    ///
    /// Returns the number of removed sessions.
    pub fn sweep(&self, now: Instant) -> usize {
        let ttl = self.inner.config.session_ttl;
        let mut removed = 0;

        self.inner.sessions.retain(|id, handle| {
            let Ok(mut session) = handle.try_lock() else {
                trace!("session {id} is busy, skipping it");
                return true;
            };

            if session.idle_for(now) <= ttl {
                return true;
            }

            if session.is_pinned() {
                if session.state() != SessionState::Empty || session.consumed_ciphertexts() > 0 {
                    debug!("resetting idle pinned session {id}");
                    session.reset();
                }
                session.touch();
                return true;
            }

            session.tombstone();
            removed += 1;
            false
        });

        self.inner.minted.fetch_sub(removed, Ordering::AcqRel);
        removed
    }
}
