//! Configuration types, read from environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;

/// Per-conversation agent settings.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// Prefix questions with "(Question n of N)".
    pub number_questions: bool,
    /// Bound for the recommendation-generation turn.
    pub recommendation_timeout: Duration,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            number_questions: true,
            recommendation_timeout: Duration::from_secs(60),
        }
    }
}

/// HTTP server settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            allowed_origins: vec![
                "http://localhost:8501".to_string(),
                "http://localhost:8502".to_string(),
            ],
        }
    }
}

/// Which front end the binary runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Http,
    Cli,
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "cli" => Ok(Self::Cli),
            other => Err(format!("expected 'http' or 'cli', got '{other}'")),
        }
    }
}

/// Everything the binary needs to start.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub mode: RunMode,
    /// Alternative reference-data file; the bundled catalog is used if unset.
    pub data_path: Option<PathBuf>,
    pub agent: AgentConfig,
    pub server: ServerConfig,
    pub llm: LlmConfig,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let mode = parse_or(&get, "CAREER_GUIDE_MODE", defaults.mode)?;
        let data_path = get("CAREER_GUIDE_DATA").map(PathBuf::from);

        let agent = AgentConfig {
            number_questions: parse_bool_or(
                &get,
                "CAREER_GUIDE_NUMBER_QUESTIONS",
                defaults.agent.number_questions,
            )?,
            recommendation_timeout: Duration::from_secs(parse_or(
                &get,
                "CAREER_GUIDE_RECOMMENDATION_TIMEOUT_SECS",
                defaults.agent.recommendation_timeout.as_secs(),
            )?),
        };

        let server = ServerConfig {
            port: parse_or(&get, "CAREER_GUIDE_PORT", defaults.server.port)?,
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or(defaults.server.allowed_origins),
        };

        let llm = LlmConfig {
            gemini_api_key: get("GEMINI_API_KEY").map(SecretString::from),
            gemini_model: get("GEMINI_MODEL").unwrap_or(defaults.llm.gemini_model),
            ollama_enabled: parse_bool_or(
                &get,
                "CAREER_GUIDE_ENABLE_OLLAMA",
                defaults.llm.ollama_enabled,
            )?,
            ollama_base_url: get("OLLAMA_BASE_URL").unwrap_or(defaults.llm.ollama_base_url),
            ollama_model: get("OLLAMA_MODEL").unwrap_or(defaults.llm.ollama_model),
        };

        Ok(Self {
            mode,
            data_path,
            agent,
            server,
            llm,
        })
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn parse_bool_or<G>(get: &G, key: &str, default: bool) -> Result<bool, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: format!("expected a boolean, got '{other}'"),
            }),
        },
        None => Ok(default),
    }
}
