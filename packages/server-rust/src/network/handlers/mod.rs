//! HTTP handler definitions for the `Dex` server.
//!
//! Defines `AppState` (the shared state carried through axum extractors) and
//! re-exports the handler functions used when building the router.

pub mod health;

pub use health::{health_handler, liveness_handler, readiness_handler};

use std::sync::Arc;
use std::time::Instant;

use super::ShutdownController;
use crate::catalog::Catalog;

/// Shared application state passed to all axum handlers via `State` extraction.
///
/// Holds `Arc`-backed handles, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// Health state, shutdown signalling, and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Currently published record store.
    pub catalog: Catalog,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
