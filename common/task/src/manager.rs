// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::ShutdownToken;
use std::future::Future;
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(10);

/// Owns the root [ShutdownToken] of a binary together with every long-running task derived from it.
///
/// Shutdown starts when any registered signal future resolves (or the root token gets cancelled),
/// after which tracked tasks are given `grace_period` to exit on their own.
pub struct ShutdownManager {
    root_token: ShutdownToken,
    signals: JoinSet<()>,
    tracker: TaskTracker,
    grace_period: Duration,
}

impl Default for ShutdownManager {
    fn default() -> Self {
        ShutdownManager::new(DEFAULT_GRACE_PERIOD)
    }
}

impl ShutdownManager {
    pub fn new(grace_period: Duration) -> Self {
        let root_token = ShutdownToken::new();
        let mut signals = JoinSet::new();

        // cancelling the root token from within any task also counts as a shutdown signal
        let cancelled = root_token.clone();
        signals.spawn(async move { cancelled.cancelled().await });

        ShutdownManager {
            root_token,
            signals,
            tracker: TaskTracker::new(),
            grace_period,
        }
    }

    /// Manager reacting to SIGINT as well as SIGTERM and SIGQUIT on unix platforms.
    pub fn with_os_signals(grace_period: Duration) -> std::io::Result<Self> {
        let manager = ShutdownManager::new(grace_period).with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        });

        #[cfg(unix)]
        {
            let mut terminate = signal(SignalKind::terminate())?;
            let mut quit = signal(SignalKind::quit())?;
            Ok(manager
                .with_shutdown(async move {
                    terminate.recv().await;
                })
                .with_shutdown(async move {
                    quit.recv().await;
                }))
        }

        #[cfg(not(unix))]
        {
            Ok(manager)
        }
    }

    /// Registers an additional future whose completion triggers the shutdown.
    #[must_use]
    pub fn with_shutdown<F>(mut self, shutdown: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let root_token = self.root_token.clone();
        self.signals.spawn(async move {
            shutdown.await;
            root_token.cancel();
        });
        self
    }

    pub fn is_cancelled(&self) -> bool {
        self.root_token.is_cancelled()
    }

    pub fn clone_shutdown_token(&self) -> ShutdownToken {
        self.root_token.clone()
    }

    pub fn child_shutdown_token(&self) -> ShutdownToken {
        self.root_token.child_token()
    }

    /// Spawns the task onto the current runtime. Shutdown waits (up to the grace period) for it to finish.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tracker.spawn(task)
    }

    pub fn tracked_tasks(&self) -> usize {
        self.tracker.len()
    }

    /// Blocks until a shutdown signal arrives, cancels every task and waits for them to exit.
    /// A second interrupt, or running out of the grace period, ends the wait early.
    pub async fn run_until_shutdown(&mut self) {
        self.tracker.close();
        self.signals.join_next().await;
        self.root_token.cancel();

        info!(
            "waiting for {} task(s) to finish... (press ctrl-c to force)",
            self.tracker.len()
        );
        tokio::select! {
            _ = self.tracker.wait() => info!("all tasks have shut down gracefully"),
            _ = tokio::time::sleep(self.grace_period) => warn!("grace period elapsed, forcing shutdown"),
            _ = tokio::signal::ctrl_c() => warn!("received interrupt, forcing shutdown"),
        }
    }
}
