/// Configuration system for devops-ingest
///
/// Supports loading from multiple sources with priority:
/// CLI args > Environment variables > Config file > Defaults
use crate::azure::auth::Credential;
use crate::error::{ConfigError, IngestError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Azure DevOps REST client configuration
    #[serde(default)]
    pub azure: AzureConfig,

    /// Line splitter configuration
    #[serde(default)]
    pub splitter: SplitterConfig,
}

/// Azure DevOps REST client configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AzureConfig {
    /// REST API version sent as `api-version`
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent header for outgoing requests
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Name of the environment variable holding the personal access token
    #[serde(default = "default_pat_env_var")]
    pub pat_env_var: String,
}

/// Line splitter configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SplitterConfig {
    /// Lines per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Lines shared by consecutive chunks
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

// Default value functions
fn default_api_version() -> String {
    crate::azure::DEFAULT_API_VERSION.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("devops-ingest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_pat_env_var() -> String {
    "AZURE_DEVOPS_PAT".to_string()
}

fn default_chunk_size() -> usize {
    crate::indexer::DEFAULT_CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    crate::indexer::DEFAULT_CHUNK_OVERLAP
}

impl Default for AzureConfig {
    fn default() -> Self {
        Self {
            api_version: default_api_version(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            pat_env_var: default_pat_env_var(),
        }
    }
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, IngestError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()).into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::LoadFailed(format!("Failed to read config file: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseFailed(format!("Invalid TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from default location or create default
    pub fn load_or_default() -> Result<Self, IngestError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();

        if config_path.exists() {
            tracing::info!("Loading config from: {}", config_path.display());
            Self::from_file(&config_path)
        } else {
            tracing::info!("No config file found, using defaults");
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), IngestError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                ConfigError::SaveFailed(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| ConfigError::SaveFailed(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved config to: {}", path.display());
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), IngestError> {
        let config_path = crate::paths::PlatformPaths::default_config_path();
        self.save(&config_path)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.azure.api_version.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "azure.api_version".to_string(),
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.azure.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "azure.timeout_secs".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.splitter.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "splitter.chunk_size".to_string(),
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }

        if self.splitter.chunk_overlap >= self.splitter.chunk_size {
            return Err(ConfigError::InvalidValue {
                key: "splitter.chunk_overlap".to_string(),
                reason: format!(
                    "must be less than chunk_size ({}), got {}",
                    self.splitter.chunk_size, self.splitter.chunk_overlap
                ),
            }
            .into());
        }

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary key lookup; unparsable values are ignored
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_version) = lookup("DEVOPS_INGEST_API_VERSION") {
            self.azure.api_version = api_version;
        }

        if let Some(timeout) = lookup("DEVOPS_INGEST_TIMEOUT_SECS")
            && let Ok(secs) = timeout.trim().parse()
        {
            self.azure.timeout_secs = secs;
        }

        if let Some(chunk_size) = lookup("DEVOPS_INGEST_CHUNK_SIZE")
            && let Ok(size) = chunk_size.trim().parse()
        {
            self.splitter.chunk_size = size;
        }

        if let Some(chunk_overlap) = lookup("DEVOPS_INGEST_CHUNK_OVERLAP")
            && let Ok(overlap) = chunk_overlap.trim().parse()
        {
            self.splitter.chunk_overlap = overlap;
        }

        if let Some(pat_env) = lookup("DEVOPS_INGEST_PAT_ENV")
            && !pat_env.trim().is_empty()
        {
            self.azure.pat_env_var = pat_env.trim().to_string();
        }
    }

    /// Read the personal access token from the configured environment variable
    pub fn resolve_credential(&self) -> Option<Credential> {
        Credential::from_optional(std::env::var(&self.azure.pat_env_var).ok())
    }

    /// Create a new Config with defaults and environment overrides
    pub fn new() -> Result<Self, IngestError> {
        let mut config = Self::load_or_default()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}
