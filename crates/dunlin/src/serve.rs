// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dunlin serve` command implementation.
//!
//! Opens storage (running migrations), then serves the HTTP trigger surface
//! until terminated. The actual pass execution happens inside the gateway's
//! POST /v1/runs handler.

use std::time::Instant;

use tracing::info;

use dunlin_config::DunlinConfig;
use dunlin_core::DunlinError;
use dunlin_gateway::{AuthConfig, GatewayState, ServerConfig, start_server};
use dunlin_storage::Database;

/// Runs the `dunlin serve` command.
pub async fn run_serve(config: DunlinConfig) -> Result<(), DunlinError> {
    init_tracing(&config.engine.log_level);
    info!("starting dunlin serve");

    let db = Database::open(&config.storage.database_path).await?;

    let state = GatewayState {
        db,
        engine: config.engine.clone(),
        auth: AuthConfig {
            bearer_token: config.gateway.bearer_token.clone(),
        },
        start_time: Instant::now(),
    };
    let server_config = ServerConfig {
        host: config.gateway.host.clone(),
        port: config.gateway.port,
    };

    start_server(&server_config, state).await
}

/// Initialize the tracing subscriber from the configured level.
///
/// `RUST_LOG` wins over the config value when set. Safe to call more than
/// once (later calls are no-ops).
pub(crate) fn init_tracing(level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
