// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;

pub const DEFAULT_HTTP_PORT: u16 = 8080;
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(30);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_SESSIONS: usize = 10_000;
pub const DEFAULT_MAX_PENDING_ENCAPSULATIONS: usize = 8;
pub const DEFAULT_MAX_CONSUMED_CIPHERTEXTS: usize = 1024;

#[derive(Debug, Clone, Copy)]
pub struct RegistryConfig {
    /// Sessions that have not been used for this long get removed by the sweeper.
    pub session_ttl: Duration,

    /// Maximum time spent waiting for the lock of a busy session.
    pub lock_timeout: Duration,

    /// Upper bound on the number of sessions minted at runtime.
    /// The pinned implicit session does not count towards it.
    pub max_sessions: usize,

    /// Number of not yet decapsulated encapsulations remembered per session.
    pub max_pending_encapsulations: usize,

    /// Number of already decapsulated ciphertexts remembered per session for replay detection.
    pub max_consumed_ciphertexts: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig {
            session_ttl: DEFAULT_SESSION_TTL,
            lock_timeout: DEFAULT_REQUEST_TIMEOUT,
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_pending_encapsulations: DEFAULT_MAX_PENDING_ENCAPSULATIONS,
            max_consumed_ciphertexts: DEFAULT_MAX_CONSUMED_CIPHERTEXTS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub registry: RegistryConfig,

    /// Upper bound on the duration of any single handshake operation.
    pub request_timeout: Duration,

    pub sweep_interval: Duration,

    /// Bind requests without an explicit session token to a single, pinned session.
    pub implicit_session: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            registry: Default::default(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            implicit_session: true,
        }
    }
}
