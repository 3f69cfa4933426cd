//! Typed parameter records, one per tool.
//!
//! Optional parameters fall back to the constants below; they are the only
//! place the defaults are written down.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 15;
pub const DEFAULT_TEMPERATURE: &str = "0.5";
pub const DEFAULT_MODEL: &str = "tess-ai-light";
pub const DEFAULT_TOOLS: &str = "no-tools";
pub const DEFAULT_PURPOSE: &str = "assistants";

fn default_page() -> u32 {
    DEFAULT_PAGE
}
fn default_per_page() -> u32 {
    DEFAULT_PER_PAGE
}
fn default_temperature() -> String {
    DEFAULT_TEMPERATURE.to_string()
}
fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_tools() -> String {
    DEFAULT_TOOLS.to_string()
}
fn default_purpose() -> String {
    DEFAULT_PURPOSE.to_string()
}

/// Agent or file identifier, forwarded in whatever form the caller sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(u64),
    Text(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// `page` / `per_page` query for listing endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl Pagination {
    pub fn query(&self) -> [(&'static str, String); 2] {
        [
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentParams {
    pub agent_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentFilesParams {
    pub agent_id: ResourceId,
    #[serde(flatten)]
    pub pagination: Pagination,
}

/// Agent + file pair, used to link and unlink.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentFileParams {
    pub agent_id: ResourceId,
    pub file_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileParams {
    pub file_id: ResourceId,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UploadFileParams {
    pub file_path: PathBuf,
    #[serde(default = "default_purpose")]
    pub purpose: String,
}

/// One chat turn handed to an agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExecuteAgentParams {
    pub agent_id: ResourceId,
    pub messages: Vec<ChatMessage>,
    #[serde(default = "default_temperature", deserialize_with = "string_or_number")]
    pub temperature: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_tools")]
    pub tools: String,
    #[serde(default)]
    pub file_ids: Vec<ResourceId>,
    #[serde(default, rename = "waitExecution")]
    pub wait_execution: bool,
}

/// Body of `POST /agents/{id}/execute`. Always carries every field.
#[derive(Debug, Serialize)]
pub struct ExecutionPayload<'a> {
    pub temperature: &'a str,
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub tools: &'a str,
    #[serde(rename = "waitExecution")]
    pub wait_execution: bool,
    pub file_ids: &'a [ResourceId],
}

impl ExecuteAgentParams {
    pub fn payload(&self) -> ExecutionPayload<'_> {
        ExecutionPayload {
            temperature: &self.temperature,
            model: &self.model,
            messages: &self.messages,
            tools: &self.tools,
            wait_execution: self.wait_execution,
            file_ids: &self.file_ids,
        }
    }
}

/// Body of `POST /agents/{id}/files`.
#[derive(Debug, Serialize)]
pub struct LinkFilePayload<'a> {
    pub file_id: &'a ResourceId,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}
