// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain model types for storage entities.
//!
//! The canonical types are defined in `dunlin-core::types` for use across
//! crate boundaries. This module re-exports them for convenience within the
//! storage crate.

pub use dunlin_core::types::{Assignment, Debtor, Draft, Invoice, Workflow, WorkflowStep};
