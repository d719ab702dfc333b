// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Dunlin collections engine.

use thiserror::Error;

/// The primary error type used across all Dunlin crates.
#[derive(Debug, Error)]
pub enum DunlinError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, migration failure).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Malformed domain data (unparseable due date, unknown bucket label).
    ///
    /// Aborts processing of the single invoice that carried the bad data,
    /// never the whole run.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A uniqueness constraint rejected a write because an equivalent record
    /// already exists (live draft, active assignment). Expected under
    /// concurrent runs and counted as a skip, not a failure.
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl DunlinError {
    /// Shorthand constructor for [`DunlinError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        DunlinError::Validation {
            message: message.into(),
        }
    }

    /// Shorthand constructor for [`DunlinError::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        DunlinError::Conflict {
            message: message.into(),
        }
    }

    /// True when this error is an expected uniqueness rejection rather than
    /// a hard failure.
    pub fn is_conflict(&self) -> bool {
        matches!(self, DunlinError::Conflict { .. })
    }
}
