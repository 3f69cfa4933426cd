//! Capability catalog and dispatch router.
//!
//! A call flows as: tool name → [`ToolName`] → typed [`ToolRequest`] →
//! one [`BackendClient`](crate::backend::BackendClient) call → envelope.

pub mod catalog;
pub mod envelope;
pub mod error;
pub mod params;
pub mod request;
pub mod router;

pub use catalog::{Capabilities, ToolDefinition, catalog};
pub use envelope::{ContentItem, NormalizedError, NormalizedResult};
pub use error::{DispatchError, ToolError};
pub use request::{ToolName, ToolRequest};
pub use router::CapabilityRouter;
