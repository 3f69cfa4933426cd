use thiserror::Error;

/// Failures talking to the remote API.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The configured base URL could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The credential cannot be carried in an HTTP header.
    #[error("Invalid API key: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    /// An identifier cannot be used as a single path segment.
    #[error("Identificador inválido para o caminho: {0:?}")]
    InvalidSegment(String),

    /// Transport-level failure (connect, TLS, body read).
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-2xx status.
    #[error("Request failed with status code {status}{}", format_body(.message))]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        message: String,
    },
}

fn format_body(message: &str) -> String {
    if message.is_empty() {
        String::new()
    } else {
        format!(": {message}")
    }
}
