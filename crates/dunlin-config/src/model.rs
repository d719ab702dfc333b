// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Dunlin collections engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Dunlin configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DunlinConfig {
    /// Batch engine behavior settings.
    #[serde(default)]
    pub engine: EngineConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// HTTP trigger gateway settings.
    #[serde(default)]
    pub gateway: GatewayConfig,
}

/// Batch engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Invoices fetched per page during a pass.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Hard cap on invoices processed in one pass. Hitting it stops the
    /// pass gracefully with `truncated = true` in the summary.
    #[serde(default = "default_max_invoices_per_run")]
    pub max_invoices_per_run: usize,

    /// What the template renderer does with tokens that have no field:
    /// `"literal"` leaves the token text in place, `"blank"` removes it.
    #[serde(default = "default_unknown_tokens")]
    pub unknown_tokens: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            batch_size: default_batch_size(),
            max_invoices_per_run: default_max_invoices_per_run(),
            unknown_tokens: default_unknown_tokens(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_batch_size() -> usize {
    500
}

fn default_max_invoices_per_run() -> usize {
    10_000
}

fn default_unknown_tokens() -> String {
    "literal".to_string()
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("dunlin").join("dunlin.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("dunlin.db"))
        .to_string_lossy()
        .into_owned()
}

/// HTTP trigger gateway configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bearer token required on `POST /v1/runs`. `None` is only valid when
    /// binding to a loopback address (validated at startup).
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            bearer_token: None,
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8270
}

impl GatewayConfig {
    /// True when the configured host only accepts local connections.
    pub fn is_loopback(&self) -> bool {
        matches!(self.host.as_str(), "127.0.0.1" | "localhost" | "::1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = DunlinConfig::default();
        assert_eq!(config.engine.log_level, "info");
        assert_eq!(config.engine.batch_size, 500);
        assert_eq!(config.engine.max_invoices_per_run, 10_000);
        assert_eq!(config.engine.unknown_tokens, "literal");
        assert!(config.storage.database_path.ends_with("dunlin.db"));
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert!(config.gateway.bearer_token.is_none());
    }

    #[test]
    fn loopback_detection() {
        let mut gateway = GatewayConfig::default();
        assert!(gateway.is_loopback());
        gateway.host = "0.0.0.0".to_string();
        assert!(!gateway.is_loopback());
        gateway.host = "::1".to_string();
        assert!(gateway.is_loopback());
    }
}
