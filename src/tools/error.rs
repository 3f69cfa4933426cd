use std::path::PathBuf;

use thiserror::Error;

use super::envelope::NormalizedError;
use crate::backend::BackendError;

/// Failure inside a single tool handler.
#[derive(Error, Debug)]
pub enum ToolError {
    /// The parameter bag did not fit the tool's record.
    #[error("Parâmetros inválidos: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// Upload source is missing on the local filesystem.
    #[error("Arquivo não encontrado: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Upload source exists but could not be read.
    #[error("Falha ao ler arquivo {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Outcome of a dispatch that did not produce a result.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// No tool with this name exists; the backend was not contacted.
    #[error("Ferramenta \"{0}\" não encontrada")]
    NotFound(String),

    /// The tool ran and failed.
    #[error("{}: {}", .0.error, .0.details)]
    Failed(NormalizedError),
}
