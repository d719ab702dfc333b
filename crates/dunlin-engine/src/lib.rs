// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The Dunlin batch engine.
//!
//! Ties the pipeline together: classify each eligible invoice into an aging
//! bucket, detect bucket transitions, resolve the governing workflow,
//! reassign when it changed, render the due step's templates, and persist a
//! draft behind the idempotency guard.
//!
//! Everything here threads one explicit `as_of` date through the whole pass
//! — the system clock is never read mid-run, so two invoices processed
//! milliseconds apart can never land on different sides of a day boundary.

pub mod aging;
pub mod orchestrator;
pub mod resolver;
pub mod template;
pub mod transition;

pub use aging::classify;
pub use orchestrator::run_daily_pass;
pub use resolver::ResolvedWorkflow;
pub use template::{FieldMap, UnknownTokenPolicy, render};
pub use transition::Transition;
