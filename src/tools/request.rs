//! The closed set of tools and their validated requests.

use std::fmt;

use serde_json::Value;

use super::params::{
    AgentFileParams, AgentFilesParams, AgentParams, ExecuteAgentParams, FileParams, Pagination,
    UploadFileParams,
};

/// Every tool the gateway exposes. Names are part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolName {
    ListAgents,
    GetAgent,
    ExecuteAgent,
    ListAgentFiles,
    LinkAgentFile,
    UnlinkAgentFile,
    ListFiles,
    GetFile,
    UploadFile,
    DeleteFile,
}

impl ToolName {
    /// Catalog order.
    pub const ALL: [Self; 10] = [
        Self::ListAgents,
        Self::GetAgent,
        Self::ExecuteAgent,
        Self::ListAgentFiles,
        Self::LinkAgentFile,
        Self::UnlinkAgentFile,
        Self::ListFiles,
        Self::GetFile,
        Self::UploadFile,
        Self::DeleteFile,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ListAgents => "listar_agentes_tess",
            Self::GetAgent => "obter_agente_tess",
            Self::ExecuteAgent => "executar_agente_tess",
            Self::ListAgentFiles => "listar_arquivos_agente_tess",
            Self::LinkAgentFile => "vincular_arquivo_agente_tess",
            Self::UnlinkAgentFile => "remover_arquivo_agente_tess",
            Self::ListFiles => "listar_arquivos_tess",
            Self::GetFile => "obter_arquivo_tess",
            Self::UploadFile => "enviar_arquivo_tess",
            Self::DeleteFile => "excluir_arquivo_tess",
        }
    }

    /// Resolve a wire name; `None` for anything outside the catalog.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tool invocation whose parameters have been validated and defaulted.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolRequest {
    ListAgents(Pagination),
    GetAgent(AgentParams),
    ExecuteAgent(ExecuteAgentParams),
    ListAgentFiles(AgentFilesParams),
    LinkAgentFile(AgentFileParams),
    UnlinkAgentFile(AgentFileParams),
    ListFiles(Pagination),
    GetFile(FileParams),
    UploadFile(UploadFileParams),
    DeleteFile(FileParams),
}

impl ToolRequest {
    /// Build the typed request for `tool` from an untyped parameter bag.
    pub fn parse(tool: ToolName, params: Value) -> Result<Self, serde_json::Error> {
        use serde_json::from_value;

        Ok(match tool {
            ToolName::ListAgents => Self::ListAgents(from_value(params)?),
            ToolName::GetAgent => Self::GetAgent(from_value(params)?),
            ToolName::ExecuteAgent => Self::ExecuteAgent(from_value(params)?),
            ToolName::ListAgentFiles => Self::ListAgentFiles(from_value(params)?),
            ToolName::LinkAgentFile => Self::LinkAgentFile(from_value(params)?),
            ToolName::UnlinkAgentFile => Self::UnlinkAgentFile(from_value(params)?),
            ToolName::ListFiles => Self::ListFiles(from_value(params)?),
            ToolName::GetFile => Self::GetFile(from_value(params)?),
            ToolName::UploadFile => Self::UploadFile(from_value(params)?),
            ToolName::DeleteFile => Self::DeleteFile(from_value(params)?),
        })
    }

    pub fn tool(&self) -> ToolName {
        match self {
            Self::ListAgents(_) => ToolName::ListAgents,
            Self::GetAgent(_) => ToolName::GetAgent,
            Self::ExecuteAgent(_) => ToolName::ExecuteAgent,
            Self::ListAgentFiles(_) => ToolName::ListAgentFiles,
            Self::LinkAgentFile(_) => ToolName::LinkAgentFile,
            Self::UnlinkAgentFile(_) => ToolName::UnlinkAgentFile,
            Self::ListFiles(_) => ToolName::ListFiles,
            Self::GetFile(_) => ToolName::GetFile,
            Self::UploadFile(_) => ToolName::UploadFile,
            Self::DeleteFile(_) => ToolName::DeleteFile,
        }
    }

    /// Prefix for failure details, naming the action and its target.
    pub fn failure_context(&self) -> String {
        match self {
            Self::ListAgents(_) => "Falha ao listar agentes".to_string(),
            Self::GetAgent(p) => format!("Falha ao obter agente {}", p.agent_id),
            Self::ExecuteAgent(p) => format!("Falha ao executar agente {}", p.agent_id),
            Self::ListAgentFiles(p) => {
                format!("Falha ao listar arquivos do agente {}", p.agent_id)
            }
            Self::LinkAgentFile(p) => format!(
                "Falha ao vincular arquivo {} ao agente {}",
                p.file_id, p.agent_id
            ),
            Self::UnlinkAgentFile(p) => format!(
                "Falha ao remover arquivo {} do agente {}",
                p.file_id, p.agent_id
            ),
            Self::ListFiles(_) => "Falha ao listar arquivos".to_string(),
            Self::GetFile(p) => format!("Falha ao obter arquivo {}", p.file_id),
            Self::UploadFile(p) => format!("Falha ao enviar arquivo {}", p.file_path.display()),
            Self::DeleteFile(p) => format!("Falha ao excluir arquivo {}", p.file_id),
        }
    }
}
