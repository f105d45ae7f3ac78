//! Azure DevOps integration
//!
//! URL normalization for Services, legacy `visualstudio.com` and Server/TFS hosts,
//! PAT handling, and a REST client for reading repository contents.

pub mod auth;
pub mod client;
pub mod models;
pub mod repo_url;
pub mod transport;

pub use auth::{Credential, build_auth_header, scrub_secret};
pub use client::{AzureDevOpsClient, DEFAULT_API_VERSION, README_CANDIDATES};
pub use models::{GitItem, RepositoryMetadata, RepositoryStructure};
pub use repo_url::{
    RepositoryDescriptor, build_file_view_url, is_azure_repository_url, parse_repository_url,
    repository_slug,
};
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
