// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./dunlin.toml` > `~/.config/dunlin/dunlin.toml` >
//! `/etc/dunlin/dunlin.toml` with environment variable overrides via the
//! `DUNLIN_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::DunlinConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/dunlin/dunlin.toml` (system-wide)
/// 3. `~/.config/dunlin/dunlin.toml` (user XDG config)
/// 4. `./dunlin.toml` (local directory)
/// 5. `DUNLIN_*` environment variables
pub fn load_config() -> Result<DunlinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DunlinConfig::default()))
        .merge(Toml::file("/etc/dunlin/dunlin.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("dunlin/dunlin.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("dunlin.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env vars).
///
/// Used for testing and explicit config file specification.
pub fn load_config_from_str(toml_content: &str) -> Result<DunlinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DunlinConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<DunlinConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(DunlinConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `DUNLIN_STORAGE_DATABASE_PATH` must map
/// to `storage.database_path`, not `storage.database.path`.
fn env_provider() -> Env {
    Env::prefixed("DUNLIN_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: DUNLIN_ENGINE_BATCH_SIZE -> "engine_batch_size"
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("engine_", "engine.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("gateway_", "gateway.", 1);
        mapped.into()
    })
}
