use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;

/// Base URL of the TESS REST API.
pub const DEFAULT_BASE_URL: &str = "https://tess.pareto.io/api";

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Interface to bind
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Bearer token for the TESS API
    #[arg(long, env = "TESS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Override the TESS API base URL
    #[arg(long, env = "TESS_API_BASE_URL")]
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default)]
    pub api_key: String,
}

impl std::fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, config::ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli =
            Cli::try_parse_from(args).map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("backend.base_url", DEFAULT_BASE_URL)?;

        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        }

        // TESS_SERVER__PORT, TESS_BACKEND__BASE_URL, ...
        builder = builder.add_source(
            Environment::with_prefix("TESS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Flags (and their env fallbacks) win over everything else.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", i64::from(port))?;
        }
        if let Some(host) = cli.host {
            builder = builder.set_override("server.host", host)?;
        }
        if let Some(key) = cli.api_key {
            builder = builder.set_override("backend.api_key", key)?;
        }
        if let Some(url) = cli.base_url {
            builder = builder.set_override("backend.base_url", url)?;
        }

        let cfg: Self = builder.build()?.try_deserialize()?;
        if cfg.backend.api_key.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "TESS_API_KEY não definida. Configure a variável de ambiente.".to_string(),
            ));
        }
        Ok(cfg)
    }

    /// Socket address string the server binds to.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
