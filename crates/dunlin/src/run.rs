// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `dunlin run` command implementation.
//!
//! One-off imperative pass — the "apply workflows now" action — printing
//! the same summary JSON the HTTP trigger returns.

use chrono::NaiveDate;

use dunlin_config::DunlinConfig;
use dunlin_core::DunlinError;
use dunlin_engine::run_daily_pass;
use dunlin_storage::Database;

use crate::serve::init_tracing;

/// Runs the `dunlin run` command.
pub async fn run_once(config: DunlinConfig, as_of: Option<String>) -> Result<(), DunlinError> {
    init_tracing(&config.engine.log_level);

    let as_of = match as_of {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| DunlinError::validation(format!("invalid --as-of `{raw}`: {e}")))?,
        None => chrono::Utc::now().date_naive(),
    };

    let db = Database::open(&config.storage.database_path).await?;
    let summary = run_daily_pass(&db, as_of, &config.engine).await?;
    db.close().await?;

    let rendered =
        serde_json::to_string_pretty(&summary).map_err(|e| DunlinError::Internal(e.to_string()))?;
    println!("{rendered}");
    Ok(())
}
