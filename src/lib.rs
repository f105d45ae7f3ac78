//! # devops-ingest - Azure DevOps repository ingestion
//!
//! Reads Git repositories hosted on Azure DevOps Services, legacy `visualstudio.com`
//! accounts and on-premises Azure DevOps Server / TFS, and prepares their text for
//! downstream indexing.
//!
//! ## Key Features
//!
//! - **URL normalization**: one descriptor for all three hosting shapes, with REST base
//!   and clone URL derived from it
//! - **REST client**: repository metadata, default branch, file listing, file content and
//!   README discovery over the Git REST API
//! - **PAT handling**: Basic auth from a personal access token, scrubbed from every
//!   surfaced error
//! - **Line-aware splitting**: overlapping chunks that keep their 1-based line range
//!
//! ## Modules
//!
//! - [`azure`]: URL parsing, authentication, transport and the REST client
//! - [`indexer`]: Line-aware text splitter
//! - [`config`]: Configuration management with environment variable support
//! - [`types`]: `Document` and metadata keys
//! - [`error`]: Error types
//! - [`paths`]: Platform config and cache directories
//!
//! ## Usage Example
//!
//! ```no_run
//! use devops_ingest::azure::{AzureDevOpsClient, Credential};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let credential = Credential::from_optional(std::env::var("AZURE_DEVOPS_PAT").ok());
//!     let client = AzureDevOpsClient::new(
//!         "https://dev.azure.com/contoso/web/_git/site",
//!         credential,
//!     )?;
//!
//!     let structure = client.fetch_repository_structure(None).await?;
//!     println!("{}", structure.file_tree);
//!     Ok(())
//! }
//! ```

/// Azure DevOps URL parsing, authentication and REST client
pub mod azure;

/// Configuration management with environment variable overrides
pub mod config;

/// Error types and utilities
pub mod error;

/// Line-aware text chunking
pub mod indexer;

/// Platform-specific config and cache paths
pub mod paths;

/// Document type flowing through the splitter
pub mod types;

pub use azure::{AzureDevOpsClient, Credential, RepositoryDescriptor, parse_repository_url};
pub use config::Config;
pub use error::{ConfigError, IngestError, RemoteError};
pub use indexer::LineAwareSplitter;
pub use types::{Document, Metadata};

/// Package version with the commit, build time and target stamped by `build.rs`
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILD_TIMESTAMP"),
    ", ",
    env!("BUILD_TARGET"),
    ")"
);
