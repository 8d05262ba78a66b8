// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

pub mod manager;

pub use manager::ShutdownManager;

/// Cancellation token handed out to every long-running task of a binary.
pub type ShutdownToken = tokio_util::sync::CancellationToken;
