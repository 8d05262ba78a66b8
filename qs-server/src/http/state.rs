// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::coordinator::HandshakeCoordinator;
use crate::registry::SessionId;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    coordinator: HandshakeCoordinator,

    /// Session used by requests that do not carry an explicit session token.
    implicit_session: Option<SessionId>,
}

impl AppState {
    pub fn new(coordinator: HandshakeCoordinator, implicit_session: Option<SessionId>) -> Self {
        if let Some(id) = implicit_session {
            coordinator.registry().create_pinned(id);
        }

        AppState {
            inner: Arc::new(AppStateInner {
                coordinator,
                implicit_session,
            }),
        }
    }

    pub fn coordinator(&self) -> &HandshakeCoordinator {
        &self.inner.coordinator
    }

    pub fn implicit_session(&self) -> Option<SessionId> {
        self.inner.implicit_session
    }
}
