// SPDX-FileCopyrightText: 2026 Dunlin Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP trigger gateway for the Dunlin collections engine.
//!
//! Exposes the batch pass to an external scheduler and to manual "apply
//! workflows now" actions:
//!
//! - `POST /v1/runs` — execute one pass (bearer auth when configured)
//! - `GET /health` — unauthenticated liveness for probes
//!
//! The caller always receives a summary JSON regardless of per-invoice
//! failures; only a fatal pass error produces a 500.

pub mod auth;
pub mod handlers;
pub mod server;

pub use auth::AuthConfig;
pub use server::{GatewayState, ServerConfig, build_router, start_server};
