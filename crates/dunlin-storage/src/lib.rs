// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence layer for the Dunlin collections engine.
//!
//! Provides WAL-mode SQLite storage with embedded migrations, a single-writer
//! concurrency model via `tokio-rusqlite`, and typed query modules for
//! invoices, debtors, workflows, assignments, and outreach drafts.
//!
//! The two at-most-one invariants of the system (one active workflow
//! assignment per invoice, one live draft per invoice) are enforced at the
//! schema level with partial unique indexes, so a race between two
//! overlapping batch runs resolves to one winner and one clean conflict.

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;

pub use database::Database;
pub use models::*;
