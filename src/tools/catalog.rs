//! Discoverable tool catalog served by `GET /capabilities`.

use std::sync::LazyLock;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::request::ToolName;

/// Name advertised in the capabilities document.
pub const SERVER_NAME: &str = "TessAIConnector";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Array,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSpec {
    #[serde(skip)]
    pub name: &'static str,
    #[serde(rename = "type")]
    pub kind: ParamType,
    pub description: &'static str,
    pub required: bool,
}

/// One catalog entry. Parameters serialize as a map keyed by name, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    #[serde(serialize_with = "serialize_parameters")]
    pub parameters: Vec<ParameterSpec>,
}

fn serialize_parameters<S: Serializer>(
    params: &[ParameterSpec],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(params.len()))?;
    for param in params {
        map.serialize_entry(param.name, param)?;
    }
    map.end()
}

/// `{ name, version, tools }` document.
#[derive(Debug, Clone, Serialize)]
pub struct Capabilities {
    pub name: &'static str,
    pub version: &'static str,
    pub tools: &'static [ToolDefinition],
}

impl Capabilities {
    pub fn current() -> Self {
        Self {
            name: SERVER_NAME,
            version: env!("CARGO_PKG_VERSION"),
            tools: catalog(),
        }
    }
}

static CATALOG: LazyLock<Vec<ToolDefinition>> =
    LazyLock::new(|| ToolName::ALL.into_iter().map(definition).collect());

/// All tool definitions, in the order of [`ToolName::ALL`].
pub fn catalog() -> &'static [ToolDefinition] {
    &CATALOG
}

const fn param(
    name: &'static str,
    kind: ParamType,
    description: &'static str,
    required: bool,
) -> ParameterSpec {
    ParameterSpec {
        name,
        kind,
        description,
        required,
    }
}

const PAGE: ParameterSpec = param(
    "page",
    ParamType::Number,
    "Número da página (padrão: 1)",
    false,
);
const PER_PAGE: ParameterSpec = param(
    "per_page",
    ParamType::Number,
    "Itens por página (padrão: 15, máx: 100)",
    false,
);

pub fn definition(tool: ToolName) -> ToolDefinition {
    let (description, parameters) = match tool {
        ToolName::ListAgents => (
            "Lista todos os agentes disponíveis na API TESS",
            vec![PAGE, PER_PAGE],
        ),
        ToolName::GetAgent => (
            "Obtém detalhes de um agente específico",
            vec![param(
                "agent_id",
                ParamType::String,
                "ID do agente a ser consultado",
                true,
            )],
        ),
        ToolName::ExecuteAgent => (
            "Executa um agente com mensagens específicas",
            vec![
                param(
                    "agent_id",
                    ParamType::String,
                    "ID do agente a ser executado",
                    true,
                ),
                param(
                    "temperature",
                    ParamType::String,
                    "Temperatura para geração (0-1)",
                    false,
                ),
                param("model", ParamType::String, "Modelo a ser usado", false),
                param(
                    "messages",
                    ParamType::Array,
                    "Mensagens para o agente (formato chat)",
                    true,
                ),
                param(
                    "tools",
                    ParamType::String,
                    "Ferramentas a serem habilitadas",
                    false,
                ),
                param(
                    "file_ids",
                    ParamType::Array,
                    "IDs dos arquivos a serem anexados",
                    false,
                ),
                param(
                    "waitExecution",
                    ParamType::Boolean,
                    "Esperar pela execução completa",
                    false,
                ),
            ],
        ),
        ToolName::ListAgentFiles => (
            "Lista todos os arquivos associados a um agente",
            vec![
                param("agent_id", ParamType::String, "ID do agente", true),
                PAGE,
                PER_PAGE,
            ],
        ),
        ToolName::LinkAgentFile => (
            "Vincula um arquivo existente a um agente",
            vec![
                param("agent_id", ParamType::String, "ID do agente", true),
                param(
                    "file_id",
                    ParamType::Number,
                    "ID do arquivo a ser vinculado",
                    true,
                ),
            ],
        ),
        ToolName::UnlinkAgentFile => (
            "Remove o vínculo de um arquivo com um agente",
            vec![
                param("agent_id", ParamType::String, "ID do agente", true),
                param(
                    "file_id",
                    ParamType::Number,
                    "ID do arquivo a ser removido",
                    true,
                ),
            ],
        ),
        ToolName::ListFiles => (
            "Lista todos os arquivos disponíveis",
            vec![PAGE, PER_PAGE],
        ),
        ToolName::GetFile => (
            "Obtém detalhes de um arquivo específico",
            vec![param(
                "file_id",
                ParamType::Number,
                "ID do arquivo a ser consultado",
                true,
            )],
        ),
        ToolName::UploadFile => (
            "Envia um novo arquivo para a plataforma TESS",
            vec![
                param(
                    "file_path",
                    ParamType::String,
                    "Caminho local do arquivo a ser enviado",
                    true,
                ),
                param(
                    "purpose",
                    ParamType::String,
                    "Propósito do arquivo (ex: 'assistants')",
                    false,
                ),
            ],
        ),
        ToolName::DeleteFile => (
            "Exclui um arquivo da plataforma TESS",
            vec![param(
                "file_id",
                ParamType::Number,
                "ID do arquivo a ser excluído",
                true,
            )],
        ),
    };

    ToolDefinition {
        name: tool.as_str(),
        description,
        parameters,
    }
}
