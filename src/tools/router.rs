//! Dispatch from a tool name and parameter bag to one backend call.

use std::sync::Arc;

use serde_json::Value;
use tracing::{error, info};

use super::catalog::Capabilities;
use super::envelope::{NormalizedError, NormalizedResult};
use super::error::{DispatchError, ToolError};
use super::params::{LinkFilePayload, UploadFileParams};
use super::request::{ToolName, ToolRequest};
use crate::backend::BackendClient;

/// Owns the catalog and executes tool calls against the backend.
///
/// Holds no mutable state; clones share the same client.
#[derive(Debug, Clone)]
pub struct CapabilityRouter {
    client: Arc<BackendClient>,
}

impl CapabilityRouter {
    pub fn new(client: Arc<BackendClient>) -> Self {
        Self { client }
    }

    pub fn capabilities(&self) -> Capabilities {
        Capabilities::current()
    }

    /// Run `tool_name` with `params`.
    ///
    /// Unknown names yield [`DispatchError::NotFound`] without touching the
    /// backend. Every other failure is logged and returned as a
    /// [`NormalizedError`] naming the tool.
    pub async fn dispatch(
        &self,
        tool_name: &str,
        params: Value,
    ) -> Result<NormalizedResult, DispatchError> {
        let Some(tool) = ToolName::from_name(tool_name) else {
            return Err(DispatchError::NotFound(tool_name.to_string()));
        };

        info!(name: "tool.dispatch", tool = %tool, "Dispatching tool call");

        match self.run(tool, params).await {
            Ok(payload) => Ok(NormalizedResult::from_json(&payload)),
            Err(details) => {
                error!(name: "tool.failed", tool = %tool, error = %details, "Tool execution failed");
                Err(DispatchError::Failed(NormalizedError::new(
                    tool.as_str(),
                    details,
                )))
            }
        }
    }

    async fn run(&self, tool: ToolName, params: Value) -> Result<Value, String> {
        let request = ToolRequest::parse(tool, params)
            .map_err(|e| ToolError::InvalidParams(e).to_string())?;

        self.execute(&request)
            .await
            .map_err(|e| format!("{}: {e}", request.failure_context()))
    }

    /// Perform the single backend call behind a validated request and return
    /// the raw response body.
    pub async fn execute(&self, request: &ToolRequest) -> Result<Value, ToolError> {
        let client = &self.client;

        let payload = match request {
            ToolRequest::ListAgents(page) => client.get(&["agents"], &page.query()).await?,
            ToolRequest::GetAgent(p) => {
                let agent = p.agent_id.to_string();
                client.get(&["agents", agent.as_str()], &[]).await?
            }
            ToolRequest::ExecuteAgent(p) => {
                let agent = p.agent_id.to_string();
                client
                    .post(&["agents", agent.as_str(), "execute"], &p.payload())
                    .await?
            }
            ToolRequest::ListAgentFiles(p) => {
                let agent = p.agent_id.to_string();
                client
                    .get(&["agents", agent.as_str(), "files"], &p.pagination.query())
                    .await?
            }
            ToolRequest::LinkAgentFile(p) => {
                let agent = p.agent_id.to_string();
                let body = LinkFilePayload { file_id: &p.file_id };
                client.post(&["agents", agent.as_str(), "files"], &body).await?
            }
            ToolRequest::UnlinkAgentFile(p) => {
                let (agent, file) = (p.agent_id.to_string(), p.file_id.to_string());
                client.delete(&["agents", agent.as_str(), "files", file.as_str()]).await?
            }
            ToolRequest::ListFiles(page) => client.get(&["files"], &page.query()).await?,
            ToolRequest::GetFile(p) => {
                let file = p.file_id.to_string();
                client.get(&["files", file.as_str()], &[]).await?
            }
            ToolRequest::UploadFile(p) => self.upload(p).await?,
            ToolRequest::DeleteFile(p) => {
                let file = p.file_id.to_string();
                client.delete(&["files", file.as_str()]).await?
            }
        };

        Ok(payload)
    }

    async fn upload(&self, params: &UploadFileParams) -> Result<Value, ToolError> {
        let path = &params.file_path;
        let exists = tokio::fs::try_exists(path)
            .await
            .map_err(|source| ToolError::Io {
                path: path.clone(),
                source,
            })?;
        if !exists {
            return Err(ToolError::FileNotFound(path.clone()));
        }

        let bytes = tokio::fs::read(path).await.map_err(|source| ToolError::Io {
            path: path.clone(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map_or_else(|| "file".to_string(), |n| n.to_string_lossy().into_owned());

        let value = self
            .client
            .post_multipart(
                &["files"],
                bytes,
                &file_name,
                &[("purpose", params.purpose.clone())],
            )
            .await?;
        Ok(value)
    }
}
