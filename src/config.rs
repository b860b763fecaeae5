use std::env;
use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_OPENAI_URL: &str = "https://api.openai.com";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_OLLAMA_MODEL: &str = "llama3";
const DEFAULT_MAX_TOKENS: u32 = 256;
const DEFAULT_CHUNK_SIZE: usize = 1000;
const DEFAULT_CHUNK_OVERLAP: usize = 200;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;
const DEFAULT_SERVER_PORT: u16 = 8000;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the analyzer, built once at startup and shared by reference.
#[derive(Clone)]
pub struct Config {
    /// Hosted model backend used for every analysis dimension.
    pub llm_provider: LlmProvider,
    /// Base URL of the selected provider.
    pub llm_base_url: String,
    /// API credential for providers that require one (OpenAI).
    pub llm_api_key: Option<String>,
    /// Completion model identifier passed to the provider.
    pub llm_model: String,
    /// Sampling temperature; the analyzer defaults to deterministic output.
    pub llm_temperature: f32,
    /// Completion budget per prompt.
    pub llm_max_tokens: u32,
    /// Optional per-call HTTP timeout for model requests.
    pub llm_timeout: Option<Duration>,
    /// Token-signing secret. Loaded for deployment parity; no route currently checks tokens.
    pub secret_key: Option<String>,
    /// Maximum characters per text chunk.
    pub chunk_size: usize,
    /// Characters shared between neighbouring chunks.
    pub chunk_overlap: usize,
    /// Directory that receives per-request scratch files.
    pub scratch_dir: PathBuf,
    /// Request body limit for uploads.
    pub max_upload_bytes: usize,
    /// Interface the HTTP server binds to.
    pub server_host: IpAddr,
    /// Port the HTTP server binds to.
    pub server_port: u16,
}

/// Supported completion backends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LlmProvider {
    /// OpenAI (or compatible) text-completions API.
    OpenAI,
    /// Local Ollama runtime.
    Ollama,
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let llm_provider = match load_env_optional("LLM_PROVIDER") {
            Some(value) => value
                .parse()
                .map_err(|()| ConfigError::InvalidValue("LLM_PROVIDER".to_string()))?,
            None => LlmProvider::OpenAI,
        };

        let (llm_base_url, llm_api_key, default_model) = match llm_provider {
            LlmProvider::OpenAI => (
                load_env_optional("OPENAI_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string()),
                Some(load_env("OPENAI_API_KEY")?),
                DEFAULT_OPENAI_MODEL,
            ),
            LlmProvider::Ollama => (
                load_env_optional("OLLAMA_URL").unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string()),
                None,
                DEFAULT_OLLAMA_MODEL,
            ),
        };

        let chunk_size = parse_optional("TEXT_SPLITTER_CHUNK_SIZE")?.unwrap_or(DEFAULT_CHUNK_SIZE);
        let chunk_overlap =
            parse_optional("TEXT_SPLITTER_CHUNK_OVERLAP")?.unwrap_or(DEFAULT_CHUNK_OVERLAP);
        if chunk_size == 0 || chunk_overlap >= chunk_size {
            return Err(ConfigError::InvalidValue(
                "TEXT_SPLITTER_CHUNK_OVERLAP must be smaller than TEXT_SPLITTER_CHUNK_SIZE"
                    .to_string(),
            ));
        }

        Ok(Self {
            llm_provider,
            llm_base_url,
            llm_api_key,
            llm_model: load_env_optional("LLM_MODEL").unwrap_or_else(|| default_model.to_string()),
            llm_temperature: parse_optional("LLM_TEMPERATURE")?.unwrap_or(0.0),
            llm_max_tokens: parse_optional("LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS),
            llm_timeout: parse_optional("LLM_TIMEOUT_SECS")?.map(Duration::from_secs),
            secret_key: load_env_optional("SECRET_KEY"),
            chunk_size,
            chunk_overlap,
            scratch_dir: load_env_optional("SCRATCH_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(env::temp_dir),
            max_upload_bytes: parse_optional("MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            server_host: parse_optional("SERVER_HOST")?.unwrap_or(IpAddr::from([0, 0, 0, 0])),
            server_port: parse_optional("SERVER_PORT")?.unwrap_or(DEFAULT_SERVER_PORT),
        })
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("llm_provider", &self.llm_provider)
            .field("llm_base_url", &self.llm_base_url)
            .field("llm_api_key", &self.llm_api_key.as_ref().map(|_| "<redacted>"))
            .field("llm_model", &self.llm_model)
            .field("llm_temperature", &self.llm_temperature)
            .field("llm_max_tokens", &self.llm_max_tokens)
            .field("llm_timeout", &self.llm_timeout)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("chunk_size", &self.chunk_size)
            .field("chunk_overlap", &self.chunk_overlap)
            .field("scratch_dir", &self.scratch_dir)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

fn load_env(key: &str) -> Result<String, ConfigError> {
    load_env_optional(key).ok_or_else(|| ConfigError::MissingVariable(key.to_string()))
}

pub(crate) fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl std::str::FromStr for LlmProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Load `.env` (if present) and build the configuration from the process environment.
pub fn load_config() -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        provider = ?config.llm_provider,
        base_url = %config.llm_base_url,
        model = %config.llm_model,
        chunk_size = config.chunk_size,
        chunk_overlap = config.chunk_overlap,
        scratch_dir = %config.scratch_dir.display(),
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
impl Config {
    /// Configuration pointing at a local OpenAI-compatible mock.
    pub(crate) fn for_tests(base_url: &str) -> Self {
        Self {
            llm_provider: LlmProvider::OpenAI,
            llm_base_url: base_url.to_string(),
            llm_api_key: Some("test-key".into()),
            llm_model: DEFAULT_OPENAI_MODEL.into(),
            llm_temperature: 0.0,
            llm_max_tokens: DEFAULT_MAX_TOKENS,
            llm_timeout: None,
            secret_key: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            scratch_dir: env::temp_dir(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            server_host: IpAddr::from([127, 0, 0, 1]),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}
