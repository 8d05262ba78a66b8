// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::registry::SessionRegistry;
use qs_task::ShutdownToken;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Background task periodically removing idle sessions from the registry.
pub struct SessionSweeper {
    shutdown_token: ShutdownToken,
    registry: SessionRegistry,
    interval: Duration,
}

impl SessionSweeper {
    pub fn new(shutdown_token: ShutdownToken, registry: SessionRegistry, interval: Duration) -> Self {
        SessionSweeper {
            shutdown_token,
            registry,
            interval,
        }
    }

    pub async fn run_forever(self) {
        info!(
            "starting the session sweeper task (interval: {})",
            humantime::format_duration(self.interval)
        );
        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_token.cancelled() => {
                    debug!("session sweeper: received shutdown");
                    break
                }
                _ = tokio::time::sleep(self.interval) => {
                    let removed = self.registry.sweep(Instant::now());
                    if removed > 0 {
                        info!("🧹 removed {removed} idle sessions ({} remaining)", self.registry.len());
                    }
                }
            }
        }
    }
}
