/// Centralized error types for devops-ingest using thiserror
///
/// Provides domain-specific error types for better error handling and user-facing messages.
use thiserror::Error;

use crate::azure::auth::scrub_secret;

/// Main error type for the ingestion system
#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Azure DevOps error: {0}")]
    Remote(#[from] RemoteError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration file: {0}")]
    LoadFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    #[error("Invalid configuration value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Failed to save configuration: {0}")]
    SaveFailed(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

/// Errors raised by the Azure DevOps REST client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RemoteError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Repository not found: {repository}. API URL: {url}. Response: {detail}")]
    RepositoryNotFound {
        repository: String,
        url: String,
        detail: String,
    },

    #[error("Repository or branch not found: {0}")]
    BranchNotFound(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("HTTP {status} from {url}: {detail}")]
    Http {
        status: u16,
        url: String,
        detail: String,
    },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Request was cancelled")]
    Cancelled,
}

impl RemoteError {
    /// True for the 404 family (repository, branch or file)
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RemoteError::RepositoryNotFound { .. }
                | RemoteError::BranchNotFound(_)
                | RemoteError::FileNotFound(_)
        )
    }

    /// True for 401/403
    pub fn is_auth_error(&self) -> bool {
        matches!(self, RemoteError::Unauthorized(_) | RemoteError::Forbidden(_))
    }

    /// Mask the raw and base64-encoded forms of `token` in every text field
    pub fn scrub(self, token: &str) -> Self {
        if token.is_empty() {
            return self;
        }
        let s = |text: String| scrub_secret(&text, token);
        match self {
            RemoteError::Unauthorized(msg) => RemoteError::Unauthorized(s(msg)),
            RemoteError::Forbidden(msg) => RemoteError::Forbidden(s(msg)),
            RemoteError::RepositoryNotFound {
                repository,
                url,
                detail,
            } => RemoteError::RepositoryNotFound {
                repository: s(repository),
                url: s(url),
                detail: s(detail),
            },
            RemoteError::BranchNotFound(branch) => RemoteError::BranchNotFound(s(branch)),
            RemoteError::FileNotFound(path) => RemoteError::FileNotFound(s(path)),
            RemoteError::Http { status, url, detail } => RemoteError::Http {
                status,
                url: s(url),
                detail: s(detail),
            },
            RemoteError::Transport(msg) => RemoteError::Transport(s(msg)),
            RemoteError::Decode { url, reason } => RemoteError::Decode {
                url: s(url),
                reason: s(reason),
            },
            other @ (RemoteError::Timeout(_) | RemoteError::Cancelled) => other,
        }
    }
}

// Conversion from anyhow::Error to IngestError
impl From<anyhow::Error> for IngestError {
    fn from(err: anyhow::Error) -> Self {
        IngestError::Other(format!("{:#}", err))
    }
}

// Helper methods for IngestError
impl IngestError {
    /// Create a new error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        IngestError::Other(msg.into())
    }

    /// Check if this is a user error (bad input or credential) vs system error
    pub fn is_user_error(&self) -> bool {
        match self {
            IngestError::Config(ConfigError::InvalidValue { .. }) => true,
            IngestError::Remote(err) => err.is_auth_error() || err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            IngestError::Remote(RemoteError::Timeout(_) | RemoteError::Transport(_)) => true,
            IngestError::Remote(RemoteError::Http { status, .. }) => *status >= 500,
            IngestError::Io(_) => true,
            _ => false,
        }
    }
}
