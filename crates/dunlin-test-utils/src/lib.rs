// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test fixtures for the Dunlin collections engine.
//!
//! Provides a temp-database harness plus seed helpers for invoices, debtors,
//! and workflow definitions so integration tests read like scenarios.

pub mod fixtures;

pub use fixtures::{CollectionsHarness, StepSpec, make_debtor, make_invoice, seed_workflow};
