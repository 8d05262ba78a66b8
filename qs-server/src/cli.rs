// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use clap::builder::ArgPredicate;
use clap::Parser;
use qs_server::config::{
    Config, RegistryConfig, DEFAULT_MAX_CONSUMED_CIPHERTEXTS, DEFAULT_MAX_PENDING_ENCAPSULATIONS,
    DEFAULT_MAX_SESSIONS,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author = "Nymtech", version, about)]
pub(crate) struct Cli {
    /// Path pointing to an env file that configures the binary.
    #[clap(short, long)]
    pub(crate) config_env_file: Option<PathBuf>,

    /// Specifies the custom port value used for the api server.
    /// default: `8080`
    #[clap(
        long,
        env = "QS_SERVER_PORT",
        default_value = "8080",
        default_value_if("bind_address", ArgPredicate::IsPresent, None)
    )]
    pub(crate) port: Option<u16>,

    /// Specifies the custom bind address value used for the api server.
    /// default: `0.0.0.0:8080`
    #[clap(long, env = "QS_SERVER_BIND_ADDRESS")]
    pub(crate) bind_address: Option<SocketAddr>,

    /// Sessions idle for longer than this get removed together with their keys.
    #[clap(
        long,
        value_parser = humantime::parse_duration,
        env = "QS_SERVER_SESSION_TTL",
        default_value = "10m",
    )]
    pub(crate) session_ttl: Duration,

    /// How often idle sessions are looked for.
    #[clap(
        long,
        value_parser = humantime::parse_duration,
        env = "QS_SERVER_SWEEP_INTERVAL",
        default_value = "30s",
    )]
    pub(crate) sweep_interval: Duration,

    /// Upper bound on the duration of any single handshake operation.
    #[clap(
        long,
        value_parser = humantime::parse_duration,
        env = "QS_SERVER_REQUEST_TIMEOUT",
        default_value = "5s",
    )]
    pub(crate) request_timeout: Duration,

    /// Maximum number of concurrently existing sessions.
    #[clap(long, env = "QS_SERVER_MAX_SESSIONS", default_value_t = DEFAULT_MAX_SESSIONS)]
    pub(crate) max_sessions: usize,

    /// Maximum number of not yet decapsulated ciphertexts remembered per session.
    #[clap(
        long,
        env = "QS_SERVER_MAX_PENDING_ENCAPSULATIONS",
        default_value_t = DEFAULT_MAX_PENDING_ENCAPSULATIONS
    )]
    pub(crate) max_pending_encapsulations: usize,

    /// Maximum number of already decapsulated ciphertexts remembered per session
    /// in order to reject their replays.
    #[clap(
        long,
        env = "QS_SERVER_MAX_CONSUMED_CIPHERTEXTS",
        default_value_t = DEFAULT_MAX_CONSUMED_CIPHERTEXTS
    )]
    pub(crate) max_consumed_ciphertexts: usize,

    /// Require every request to carry an explicit session token
    /// instead of falling back to the single implicit session.
    #[clap(long, env = "QS_SERVER_DISABLE_IMPLICIT_SESSION")]
    pub(crate) disable_implicit_session: bool,
}

impl Cli {
    pub(crate) fn bind_address(&self) -> SocketAddr {
        // SAFETY:
        // if `bind_address` hasn't been specified, `port` will default to "8080",
        // so some value will always be available to use
        #[allow(clippy::unwrap_used)]
        self.bind_address.unwrap_or_else(|| {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), self.port.unwrap())
        })
    }

    pub(crate) fn config(&self) -> Config {
        Config {
            registry: RegistryConfig {
                session_ttl: self.session_ttl,
                lock_timeout: self.request_timeout,
                max_sessions: self.max_sessions,
                max_pending_encapsulations: self.max_pending_encapsulations,
                max_consumed_ciphertexts: self.max_consumed_ciphertexts,
            },
            request_timeout: self.request_timeout,
            sweep_interval: self.sweep_interval,
            implicit_session: !self.disable_implicit_session,
        }
    }
}
