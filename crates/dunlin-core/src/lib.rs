// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Dunlin collections engine.
//!
//! This crate provides the domain types (aging buckets, invoices, workflows,
//! assignments, drafts) and the error type used throughout the Dunlin
//! workspace. It carries no I/O; storage and orchestration live in the
//! sibling crates.

pub mod error;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::DunlinError;
pub use types::{AgingBucket, Channel, DraftStatus, InvoiceStatus, RunError, RunSummary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dunlin_error_has_all_variants() {
        let _config = DunlinError::Config("test".into());
        let _storage = DunlinError::Storage {
            source: Box::new(std::io::Error::other("test")),
        };
        let _validation = DunlinError::validation("bad due date");
        let _conflict = DunlinError::conflict("draft exists");
        let _internal = DunlinError::Internal("test".into());
    }

    #[test]
    fn conflict_predicate_only_matches_conflicts() {
        assert!(DunlinError::conflict("dup").is_conflict());
        assert!(!DunlinError::validation("bad").is_conflict());
        assert!(
            !DunlinError::Storage {
                source: Box::new(std::io::Error::other("io")),
            }
            .is_conflict()
        );
    }

    #[test]
    fn error_messages_include_context() {
        let err = DunlinError::validation("unparseable due date `2026-13-40`");
        assert!(err.to_string().contains("2026-13-40"));

        let err = DunlinError::conflict("live draft already exists for invoice inv-9");
        assert!(err.to_string().contains("inv-9"));
    }
}
