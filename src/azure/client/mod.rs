//! Azure DevOps REST client
//!
//! Fetches repository metadata, file listings, file content and README text for a
//! single repository. Each operation issues its own GET requests against
//! `{api_base}/_apis/git/repositories/{repo}` with no retries; callers that need
//! retries or parallelism layer them on top.

use crate::azure::auth::Credential;
use crate::azure::models::{FALLBACK_BRANCH, ItemList, RepositoryMetadata, RepositoryStructure};
use crate::azure::repo_url::{RepositoryDescriptor, build_file_view_url, parse_repository_url};
use crate::azure::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use crate::config::Config;
use crate::error::{ConfigError, IngestError, RemoteError};

use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use url::Url;

#[cfg(test)]
mod tests;

/// Default Azure DevOps REST API version
pub const DEFAULT_API_VERSION: &str = "7.1";

/// README file names tried in order by [`AzureDevOpsClient::fetch_readme`]
pub const README_CANDIDATES: [&str; 5] =
    ["README.md", "README.MD", "readme.md", "README.txt", "README"];

/// Number of response body characters kept in error details
const ERROR_DETAIL_LIMIT: usize = 200;

/// Which resource a request targeted, for status-code mapping
enum Resource<'a> {
    Repository,
    Tree { branch: &'a str },
    File { path: &'a str },
}

/// Client for one Azure DevOps repository
///
/// # Example
///
/// ```no_run
/// use devops_ingest::azure::{AzureDevOpsClient, Credential};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let client = AzureDevOpsClient::new(
///         "https://dev.azure.com/myorg/myproject/_git/myrepo",
///         Some(Credential::new("my-pat")),
///     )?;
///
///     let structure = client.fetch_repository_structure(None).await?;
///     println!("{}", structure.file_tree);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct AzureDevOpsClient {
    descriptor: RepositoryDescriptor,
    credential: Option<Credential>,
    api_version: String,
    transport: Arc<dyn HttpTransport>,
    cancel: CancellationToken,
}

impl fmt::Debug for AzureDevOpsClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureDevOpsClient")
            .field("descriptor", &self.descriptor)
            .field("has_credential", &self.credential.is_some())
            .field("api_version", &self.api_version)
            .finish()
    }
}

impl AzureDevOpsClient {
    /// Create a client with the default reqwest transport and API version
    pub fn new(repo_url: &str, credential: Option<Credential>) -> Result<Self, IngestError> {
        Self::from_config(repo_url, credential, &Config::default())
    }

    /// Create a client using API version, timeout and user agent from `config`
    pub fn from_config(
        repo_url: &str,
        credential: Option<Credential>,
        config: &Config,
    ) -> Result<Self, IngestError> {
        // Validate the URL before building any HTTP machinery
        let descriptor = Self::parse_descriptor(repo_url, credential.as_ref())?;

        let transport =
            ReqwestTransport::new(config.azure.timeout_secs, &config.azure.user_agent)?;
        let client = Self::from_parts(descriptor, credential, Arc::new(transport))
            .with_api_version(config.azure.api_version.clone());
        Ok(client)
    }

    /// Create a client over a caller-supplied transport
    pub fn with_transport(
        repo_url: &str,
        credential: Option<Credential>,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ConfigError> {
        let descriptor = Self::parse_descriptor(repo_url, credential.as_ref())?;
        Ok(Self::from_parts(descriptor, credential, transport))
    }

    fn from_parts(
        descriptor: RepositoryDescriptor,
        credential: Option<Credential>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        tracing::debug!(
            "Azure DevOps client initialized: host={}, organization={}, project={}, repository={}, api_base={}, is_server={}, has_pat={}",
            descriptor.host,
            descriptor.organization,
            descriptor.project,
            descriptor.repository,
            descriptor.api_base,
            descriptor.is_server,
            credential.is_some()
        );

        Self {
            descriptor,
            credential,
            api_version: DEFAULT_API_VERSION.to_string(),
            transport,
            cancel: CancellationToken::new(),
        }
    }

    fn parse_descriptor(
        repo_url: &str,
        credential: Option<&Credential>,
    ) -> Result<RepositoryDescriptor, ConfigError> {
        parse_repository_url(repo_url).ok_or_else(|| {
            let shown = match credential {
                Some(c) => crate::azure::auth::scrub_secret(repo_url, c.expose()),
                None => repo_url.to_string(),
            };
            ConfigError::InvalidValue {
                key: "repo_url".to_string(),
                reason: format!(
                    "Invalid Azure DevOps URL: {}. Expected format: https://{{host}}/{{collection}}/{{project}}/_git/{{repo}}",
                    shown
                ),
            }
        })
    }

    /// Override the REST API version (default `7.1`)
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Abort in-flight and future requests when `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn descriptor(&self) -> &RepositoryDescriptor {
        &self.descriptor
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Web URL for viewing `file_path` on `branch`
    pub fn file_view_url(&self, file_path: &str, branch: &str) -> String {
        build_file_view_url(&self.descriptor.clone_url, file_path, branch)
    }

    pub(crate) fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![
            ("Accept", "application/json".to_string()),
            ("Content-Type", "application/json".to_string()),
        ];
        if let Some(credential) = &self.credential {
            headers.push(("Authorization", credential.auth_header()));
        }
        headers
    }

    fn endpoint(&self, suffix: &str, params: &[(&str, &str)]) -> Result<Url, RemoteError> {
        let base = format!(
            "{}/_apis/git/repositories/{}{}",
            self.descriptor.api_base, self.descriptor.repository, suffix
        );
        Url::parse_with_params(&base, params)
            .map_err(|e| RemoteError::Transport(format!("Invalid request URL {}: {}", base, e)))
    }

    async fn send(&self, url: &Url) -> Result<HttpResponse, RemoteError> {
        tracing::debug!("GET {}", url);
        let headers = self.headers();

        let response = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(RemoteError::Cancelled),
            result = self.transport.get(url, &headers) => result?,
        };

        tracing::debug!("Response status: {} from {}", response.status, url);
        Ok(response)
    }

    /// Map HTTP status codes to errors for the requested resource
    fn check_status(
        &self,
        resource: Resource<'_>,
        response: HttpResponse,
        url: &Url,
    ) -> Result<HttpResponse, RemoteError> {
        let detailed = matches!(resource, Resource::Repository);
        match response.status {
            401 => Err(RemoteError::Unauthorized(if detailed {
                "Invalid or missing PAT. Please check your Personal Access Token.".to_string()
            } else {
                "Invalid or missing PAT.".to_string()
            })),
            403 => Err(RemoteError::Forbidden(if detailed {
                "Your PAT doesn't have permission to access this repository. Ensure it has 'Code (Read)' scope.".to_string()
            } else {
                "Insufficient permissions.".to_string()
            })),
            404 => Err(match resource {
                Resource::Repository => RemoteError::RepositoryNotFound {
                    repository: self.descriptor.repository.clone(),
                    url: url.to_string(),
                    detail: truncate_detail(&response.body),
                },
                Resource::Tree { branch } => RemoteError::BranchNotFound(branch.to_string()),
                Resource::File { path } => RemoteError::FileNotFound(path.to_string()),
            }),
            _ if response.is_success() => Ok(response),
            status => Err(RemoteError::Http {
                status,
                url: url.to_string(),
                detail: truncate_detail(&response.body),
            }),
        }
    }

    fn scrub(&self, err: RemoteError) -> RemoteError {
        match &self.credential {
            Some(credential) => err.scrub(credential.expose()),
            None => err,
        }
    }

    /// Fetch repository metadata (includes the default branch ref)
    pub async fn fetch_repository_metadata(&self) -> Result<RepositoryMetadata, RemoteError> {
        self.repository_metadata().await.map_err(|e| self.scrub(e))
    }

    async fn repository_metadata(&self) -> Result<RepositoryMetadata, RemoteError> {
        let url = self.endpoint("", &[("api-version", self.api_version.as_str())])?;
        let response = self.send(&url).await?;
        let response = self.check_status(Resource::Repository, response, &url)?;

        serde_json::from_str(&response.body).map_err(|e| RemoteError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    /// Default branch name without `refs/heads/`.
    ///
    /// Never fails: any error is logged and `main` is returned.
    pub async fn fetch_default_branch(&self) -> String {
        match self.fetch_repository_metadata().await {
            Ok(metadata) => metadata.default_branch_name(),
            Err(e) => {
                tracing::warn!("Could not get default branch, using '{}': {}", FALLBACK_BRANCH, e);
                FALLBACK_BRANCH.to_string()
            }
        }
    }

    async fn resolve_branch(&self, branch: Option<&str>) -> String {
        match branch {
            Some(b) if !b.is_empty() => b.to_string(),
            _ => self.fetch_default_branch().await,
        }
    }

    /// List every file (blob) in the repository, relative to the root
    pub async fn list_files(&self, branch: Option<&str>) -> Result<Vec<String>, RemoteError> {
        let branch = self.resolve_branch(branch).await;
        self.file_tree(&branch).await.map_err(|e| self.scrub(e))
    }

    async fn file_tree(&self, branch: &str) -> Result<Vec<String>, RemoteError> {
        let url = self.endpoint(
            "/items",
            &[
                ("scopePath", "/"),
                ("recursionLevel", "Full"),
                ("includeContentMetadata", "true"),
                ("versionDescriptor.version", branch),
                ("api-version", self.api_version.as_str()),
            ],
        )?;
        let response = self.send(&url).await?;
        let response = self.check_status(Resource::Tree { branch }, response, &url)?;

        let items: ItemList =
            serde_json::from_str(&response.body).map_err(|e| RemoteError::Decode {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        Ok(items
            .value
            .iter()
            .filter(|item| item.is_blob())
            .map(|item| item.relative_path().to_string())
            .collect())
    }

    /// Raw text content of one file
    pub async fn fetch_file_content(
        &self,
        file_path: &str,
        branch: Option<&str>,
    ) -> Result<String, RemoteError> {
        let branch = self.resolve_branch(branch).await;
        self.file_content(file_path, &branch)
            .await
            .map_err(|e| self.scrub(e))
    }

    async fn file_content(&self, file_path: &str, branch: &str) -> Result<String, RemoteError> {
        let path = if file_path.starts_with('/') {
            file_path.to_string()
        } else {
            format!("/{}", file_path)
        };

        let url = self.endpoint(
            "/items",
            &[
                ("path", path.as_str()),
                ("includeContent", "true"),
                ("versionDescriptor.version", branch),
                ("api-version", self.api_version.as_str()),
                ("$format", "text"),
            ],
        )?;
        let response = self.send(&url).await?;
        let response = self.check_status(Resource::File { path: &path }, response, &url)?;
        Ok(response.body)
    }

    /// README text from the first matching [`README_CANDIDATES`] entry, or `""`
    pub async fn fetch_readme(&self, branch: Option<&str>) -> String {
        let branch = self.resolve_branch(branch).await;

        for candidate in README_CANDIDATES {
            match self.fetch_file_content(candidate, Some(&branch)).await {
                Ok(content) => return content,
                Err(e) => tracing::debug!("README candidate {} unavailable: {}", candidate, e),
            }
        }

        tracing::info!("No README file found in repository");
        String::new()
    }

    /// File tree, README and branch in one call
    pub async fn fetch_repository_structure(
        &self,
        branch: Option<&str>,
    ) -> Result<RepositoryStructure, RemoteError> {
        let branch = self.resolve_branch(branch).await;

        let files = self.list_files(Some(&branch)).await?;
        let readme = self.fetch_readme(Some(&branch)).await;

        Ok(RepositoryStructure {
            file_tree: files.join("\n"),
            readme,
            default_branch: branch,
        })
    }
}

fn truncate_detail(body: &str) -> String {
    body.chars().take(ERROR_DETAIL_LIMIT).collect()
}
