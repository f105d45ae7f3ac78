//! Repository URL normalization
//!
//! Three URL dialects are accepted and funneled into one [`RepositoryDescriptor`]:
//!
//! - Azure DevOps Services: `https://dev.azure.com/{org}/{project}/_git/{repo}`
//! - Legacy Services: `https://{org}.visualstudio.com/{project}/_git/{repo}`
//! - Azure DevOps Server/TFS: `https://{host}/{collection}/{project}/_git/{repo}`
//!
//! Any host whose path carries a literal `_git` segment is accepted as a server URL.
//! This keeps compatibility with self-hosted instances on arbitrary hostnames, at the
//! cost of also accepting unrelated systems that happen to use a `_git` segment.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use url::Url;

/// Azure DevOps Services host
pub const DEV_AZURE_HOST: &str = "dev.azure.com";

/// Legacy Azure DevOps Services domain (`{org}.visualstudio.com`)
pub const VISUALSTUDIO_DOMAIN: &str = "visualstudio.com";

/// Path segment separating project from repository
const GIT_SEGMENT: &str = "_git";

static UNSAFE_SLUG_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("slug pattern is valid"));

/// Parsed Azure DevOps repository coordinates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Lowercased network location (includes a non-default port)
    pub host: String,
    /// Organization for Services, collection for Server/TFS
    pub organization: String,
    pub project: String,
    pub repository: String,
    /// Prefix for REST calls, e.g. `https://dev.azure.com/{org}/{project}`
    pub api_base: String,
    /// The input URL with whitespace, one trailing `/` and `.git` removed
    pub clone_url: String,
    /// True for Azure DevOps Server/TFS, false for Services
    pub is_server: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostKind {
    Services,
    LegacyServices,
    Server,
}

/// Loose Services check used to decide `is_server`.
///
/// Any host mentioning `dev.azure.com` or `visualstudio.com` counts, ports and
/// proxies included. [`HostKind::of`] is stricter: only the bare `dev.azure.com`
/// host gets the Services layout, so `dev.azure.com:8443` is classified as cloud
/// here but keeps its port in `api_base` and in the slug host label.
fn is_cloud_host(host: &str) -> bool {
    host.contains(DEV_AZURE_HOST) || host.contains(VISUALSTUDIO_DOMAIN)
}

impl HostKind {
    /// Exact layout of `host`; see [`is_cloud_host`] for the looser `is_server` split
    fn of(host: &str) -> Self {
        if host == DEV_AZURE_HOST {
            HostKind::Services
        } else if host.contains(VISUALSTUDIO_DOMAIN) {
            HostKind::LegacyServices
        } else {
            HostKind::Server
        }
    }
}

/// Trim whitespace, one trailing slash and a `.git` suffix
fn clean_repository_url(url: &str) -> &str {
    let trimmed = url.trim();
    let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    trimmed.strip_suffix(".git").unwrap_or(trimmed)
}

/// URL with any username/password removed, for logging
fn redact_userinfo(url: &Url) -> Url {
    let mut shown = url.clone();
    let _ = shown.set_password(None);
    let _ = shown.set_username("");
    shown
}

/// Parse an Azure DevOps repository URL.
///
/// Returns `None` for empty input, non-Azure URLs, and URLs missing the project,
/// repository or organization/collection. Never panics.
pub fn parse_repository_url(url: &str) -> Option<RepositoryDescriptor> {
    let clone_url = clean_repository_url(url);
    if clone_url.is_empty() {
        return None;
    }

    let parsed = match Url::parse(clone_url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!("Not an Azure DevOps URL: {}", e);
            return None;
        }
    };
    let shown = redact_userinfo(&parsed);

    let host = match parsed.host_str() {
        Some(h) if !h.is_empty() => match parsed.port() {
            Some(port) => format!("{}:{}", h.to_lowercase(), port),
            None => h.to_lowercase(),
        },
        _ => {
            tracing::warn!("Not an Azure DevOps URL (no host): {}", shown);
            return None;
        }
    };

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    tracing::debug!("Parsing Azure URL: host={}, path={:?}", host, segments);

    let is_server = if is_cloud_host(&host) {
        false
    } else if segments.contains(&GIT_SEGMENT) {
        true
    } else {
        tracing::warn!("Not an Azure DevOps URL: {}", shown);
        return None;
    };

    let Some(git_index) = segments.iter().position(|s| *s == GIT_SEGMENT) else {
        tracing::warn!("Could not find '_git' in Azure DevOps URL: {}", shown);
        return None;
    };

    let Some(repository) = segments.get(git_index + 1) else {
        tracing::warn!("Missing repository name in Azure DevOps URL: {}", shown);
        return None;
    };

    if git_index < 1 {
        tracing::warn!("Missing project in Azure DevOps URL: {}", shown);
        return None;
    }
    let project = segments[git_index - 1];

    let kind = HostKind::of(&host);
    let organization = match kind {
        HostKind::LegacyServices => host.split('.').next().unwrap_or_default().to_string(),
        HostKind::Services | HostKind::Server => {
            if git_index < 2 {
                tracing::warn!(
                    "Missing organization/collection in Azure DevOps URL: {}",
                    shown
                );
                return None;
            }
            segments[0].to_string()
        }
    };
    if organization.is_empty() {
        return None;
    }

    let scheme = parsed.scheme();
    let api_base = match kind {
        HostKind::LegacyServices => format!("{scheme}://{host}/{project}"),
        HostKind::Services | HostKind::Server => {
            format!("{scheme}://{host}/{organization}/{project}")
        }
    };

    tracing::debug!(
        "Parsed Azure DevOps: org={}, project={}, repo={}, api_base={}",
        organization,
        project,
        repository,
        api_base
    );

    Some(RepositoryDescriptor {
        host,
        organization,
        project: project.to_string(),
        repository: repository.to_string(),
        api_base,
        clone_url: clone_url.to_string(),
        is_server,
    })
}

/// Cheap case-insensitive pre-filter for Azure DevOps URLs
pub fn is_azure_repository_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }
    let lower = url.to_lowercase();
    lower.contains(DEV_AZURE_HOST) || lower.contains(VISUALSTUDIO_DOMAIN) || lower.contains("/_git/")
}

fn sanitize_slug_component(component: &str) -> String {
    UNSAFE_SLUG_CHARS.replace_all(component, "_").into_owned()
}

/// Filesystem-safe identifier for cache and database naming.
///
/// `{org}_{project}_{repo}` on `dev.azure.com`; other hosts are prefixed with their
/// first host label so identically named repos on different servers stay apart.
pub fn repository_slug(descriptor: &RepositoryDescriptor) -> String {
    let org = sanitize_slug_component(&descriptor.organization);
    let project = sanitize_slug_component(&descriptor.project);
    let repo = sanitize_slug_component(&descriptor.repository);

    if descriptor.host == DEV_AZURE_HOST {
        format!("{org}_{project}_{repo}")
    } else {
        let host_label = descriptor.host.split('.').next().unwrap_or_default();
        format!(
            "{}_{org}_{project}_{repo}",
            sanitize_slug_component(host_label)
        )
    }
}

/// Browsable web URL for a file; returns `file_path` unchanged if `repo_url` doesn't parse
pub fn build_file_view_url(repo_url: &str, file_path: &str, branch: &str) -> String {
    let Some(descriptor) = parse_repository_url(repo_url) else {
        return file_path.to_string();
    };

    let path = if file_path.starts_with('/') {
        file_path.to_string()
    } else {
        format!("/{file_path}")
    };

    let encoded_path = path
        .split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/");

    format!(
        "{}/_git/{}?path={}&version=GB{}",
        descriptor.api_base, descriptor.repository, encoded_path, branch
    )
}
