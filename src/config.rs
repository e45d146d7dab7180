use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::llm::{GenerationClient, ProviderConfig};
use crate::core::persona_gen::{
    PromptComposer, TraitBound, DEFAULT_MIN_INTERESTS, DEFAULT_REQUESTED_INTERESTS,
    DEFAULT_TRAIT_BOUND,
};

/// Prefix for environment overrides, e.g. `ZUNZUNEO_LLM__MODEL=gpt-4o-mini`.
pub const ENV_PREFIX: &str = "ZUNZUNEO_";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),

    #[error("API key not set: export {var} or add it to .env")]
    MissingApiKey { var: String },

    #[error("trait_bound must be between 1 and 100, got {0}")]
    InvalidTraitBound(u8),

    #[error("llm.timeout_secs must be at least 1")]
    ZeroTimeout,
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub generation: GenerationConfig,
    pub logging: LoggingConfig,
}

/// Completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible base URL; `None` uses api.openai.com.
    pub base_url: Option<String>,
    pub model: String,
    /// Name of the environment variable holding the API key.
    pub api_key_env: String,
    pub organization_id: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
    pub timeout_secs: u64,
}

/// Persona generation knobs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub trait_bound: u8,
    /// Interest count asked for in the prompt.
    pub requested_interests: usize,
    /// Interest count the parser enforces.
    pub min_interests: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback filter when `RUST_LOG` is unset.
    pub level: String,
    /// Override the default log directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            model: "gpt-4o".to_string(),
            api_key_env: "OPEN_AI_KEY".to_string(),
            organization_id: None,
            max_tokens: 4096,
            temperature: None,
            timeout_secs: 120,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            trait_bound: DEFAULT_TRAIT_BOUND,
            requested_interests: DEFAULT_REQUESTED_INTERESTS,
            min_interests: DEFAULT_MIN_INTERESTS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from `~/.config/zunzuneo/config.toml` plus environment overrides.
    /// A missing file falls back to defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load from an explicit file plus environment overrides.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            log::info!("Loading config from {}", path.display());
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }
        Self::extract(Self::figment(path).merge(Env::prefixed(ENV_PREFIX).split("__")))
    }

    /// Defaults layered with `path`, without the environment layer.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(AppConfig::default())).merge(Toml::file(path))
    }

    pub fn extract(figment: Figment) -> Result<Self> {
        let config: AppConfig = figment.extract().map_err(Box::new)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.llm.timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        self.trait_bound().map(|_| ())
    }

    pub fn trait_bound(&self) -> Result<TraitBound> {
        TraitBound::new(self.generation.trait_bound)
            .ok_or(ConfigError::InvalidTraitBound(self.generation.trait_bound))
    }

    /// Resolve the API key from the configured environment variable.
    pub fn api_key(&self) -> Result<String> {
        match std::env::var(&self.llm.api_key_env) {
            Ok(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(ConfigError::MissingApiKey {
                var: self.llm.api_key_env.clone(),
            }),
        }
    }

    pub fn provider_config(&self) -> Result<ProviderConfig> {
        Ok(ProviderConfig::OpenAI {
            api_key: self.api_key()?,
            model: self.llm.model.clone(),
            max_tokens: self.llm.max_tokens,
            organization_id: self.llm.organization_id.clone(),
            base_url: self.llm.base_url.clone(),
        })
    }

    /// Build the completion client described by the `llm` section.
    pub fn generation_client(&self) -> Result<GenerationClient> {
        let provider = self.provider_config()?.create_provider();
        let mut client = GenerationClient::new(provider)
            .with_timeout(Duration::from_secs(self.llm.timeout_secs))
            .with_max_tokens(self.llm.max_tokens);
        if let Some(temperature) = self.llm.temperature {
            client = client.with_temperature(temperature);
        }
        Ok(client)
    }

    pub fn prompt_composer(&self) -> Result<PromptComposer> {
        Ok(PromptComposer::new(
            self.generation.requested_interests,
            self.trait_bound()?,
        ))
    }

    /// Resolved log directory (override or XDG default).
    pub fn log_dir(&self) -> PathBuf {
        self.logging.log_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .map(|d| d.join("zunzuneo").join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("zunzuneo").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }
}
