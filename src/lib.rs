//! TESS AI connector
//!
//! A tool-invocation gateway in front of the TESS agent-execution API.
//! Callers discover a fixed catalog of named tools and invoke any of them
//! with a flat JSON parameter object.
//!
//! # Architecture
//!
//! - **Server**: Axum HTTP surface (`/health`, `/capabilities`, `/tools/{name}`)
//! - **Capability Router**: typed per-tool requests, defaults, and envelopes
//! - **Backend Client**: reqwest client bound to the TESS base URL and token
//!
//! # Modules
//!
//! - [`backend`]: outbound HTTP client and its errors
//! - [`config`]: CLI, environment, and file configuration
//! - [`server`]: route wiring and response mapping
//! - [`tools`]: catalog, parameter records, and dispatch

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod backend;
pub mod config;
pub mod server;
pub mod tools;

use std::sync::Arc;
use tools::CapabilityRouter;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Catalog and dispatch, bound to the configured backend.
    pub router: Arc<CapabilityRouter>,
}
