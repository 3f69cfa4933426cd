//! Outbound client for the TESS REST API.
//!
//! A single [`BackendClient`] is built at startup from [`BackendConfig`]
//! and shared read-only by every dispatch.
//!
//! [`BackendConfig`]: crate::config::BackendConfig

pub mod client;
pub mod error;

pub use client::BackendClient;
pub use error::BackendError;
