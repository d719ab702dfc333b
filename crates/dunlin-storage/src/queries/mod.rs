// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules, one per entity.

pub mod assignments;
pub mod debtors;
pub mod drafts;
pub mod invoices;
pub mod workflows;
