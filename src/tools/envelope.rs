//! Uniform success and failure envelopes returned for every dispatch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Successful tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedResult {
    pub content: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentItem {
    Text { text: String },
}

impl NormalizedResult {
    /// Wrap a backend payload as a single text item holding its JSON form.
    pub fn from_json(payload: &Value) -> Self {
        Self {
            content: vec![ContentItem::Text {
                text: payload.to_string(),
            }],
        }
    }
}

/// Tool failure as seen by callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedError {
    pub error: String,
    pub details: String,
}

impl NormalizedError {
    pub fn new(tool: &str, details: impl Into<String>) -> Self {
        Self {
            error: format!("Falha ao executar ferramenta {tool}"),
            details: details.into(),
        }
    }
}
