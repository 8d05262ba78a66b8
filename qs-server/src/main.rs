// Copyright 2026 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: Apache-2.0

use crate::cli::Cli;
use clap::Parser;
use qs_bin_common::logging::{maybe_print_banner, setup_tracing_logger};
use qs_kem::MlKem1024;
use qs_server::error::QsServerError;
use qs_server::http::router::build_router;
use qs_server::http::HttpServer;
use qs_server::tasks::SessionSweeper;
use qs_task::manager::DEFAULT_GRACE_PERIOD;
use qs_task::ShutdownManager;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

mod cli;

fn load_env_file(path: &Path) -> Result<(), QsServerError> {
    dotenvy::from_path_override(path).map_err(|source| QsServerError::EnvFileLoadFailure {
        path: path.display().to_string(),
        source,
    })
}

fn parse_cli() -> anyhow::Result<Cli> {
    let cli = Cli::parse();
    let Some(env_file) = &cli.config_env_file else {
        return Ok(cli);
    };

    // values coming from the env file have to be visible to clap as well
    load_env_file(env_file)?;
    Ok(Cli::parse())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = parse_cli()?;
    setup_tracing_logger()?;
    maybe_print_banner(clap::crate_name!(), clap::crate_version!());

    let config = cli.config();
    let bind_address = cli.bind_address();

    let kem = Arc::new(MlKem1024::new());
    let state = qs_server::build_app_state(&config, kem);
    if let Some(implicit) = state.implicit_session() {
        info!("requests without a session token are bound to the implicit session {implicit}");
    }
    let registry = state.coordinator().registry().clone();

    let mut shutdown_manager = ShutdownManager::with_os_signals(DEFAULT_GRACE_PERIOD)?;

    let sweeper = SessionSweeper::new(
        shutdown_manager.clone_shutdown_token(),
        registry,
        config.sweep_interval,
    );
    shutdown_manager.spawn(sweeper.run_forever());

    let server_shutdown = shutdown_manager.clone_shutdown_token();
    let http_server = HttpServer::new(bind_address, build_router(state), server_shutdown.clone());
    shutdown_manager.spawn(async move {
        if let Err(err) = http_server.run().await {
            error!("{err}");
            server_shutdown.cancel();
        }
    });

    shutdown_manager.run_until_shutdown().await;
    info!("quitting");
    Ok(())
}
