// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation of configuration values.
//!
//! Figment + serde guarantee shape; this module checks value-level rules
//! that serde cannot express (cross-field constraints, enumerated strings).

use crate::diagnostic::ConfigError;
use crate::model::DunlinConfig;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const VALID_UNKNOWN_TOKEN_POLICIES: &[&str] = &["literal", "blank"];

/// Validate a loaded configuration. Collects all failures rather than
/// stopping at the first.
pub fn validate_config(config: &DunlinConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !VALID_LOG_LEVELS.contains(&config.engine.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.log_level `{}` is not one of {}",
                config.engine.log_level,
                VALID_LOG_LEVELS.join(", ")
            ),
        });
    }

    if !VALID_UNKNOWN_TOKEN_POLICIES.contains(&config.engine.unknown_tokens.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.unknown_tokens `{}` is not one of {}",
                config.engine.unknown_tokens,
                VALID_UNKNOWN_TOKEN_POLICIES.join(", ")
            ),
        });
    }

    if config.engine.batch_size == 0 {
        errors.push(ConfigError::Validation {
            message: "engine.batch_size must be at least 1".to_string(),
        });
    }

    if config.engine.max_invoices_per_run < config.engine.batch_size {
        errors.push(ConfigError::Validation {
            message: format!(
                "engine.max_invoices_per_run ({}) must be >= engine.batch_size ({})",
                config.engine.max_invoices_per_run, config.engine.batch_size
            ),
        });
    }

    // An unauthenticated trigger endpoint must not be reachable from off-host.
    if config.gateway.bearer_token.is_none() && !config.gateway.is_loopback() {
        errors.push(ConfigError::Validation {
            message: format!(
                "gateway.host `{}` is not a loopback address; set gateway.bearer_token \
                 before exposing the trigger endpoint",
                config.gateway.host
            ),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
