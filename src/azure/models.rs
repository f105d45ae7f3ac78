use serde::{Deserialize, Serialize};

/// Prefix Azure DevOps puts on branch refs
pub const BRANCH_REF_PREFIX: &str = "refs/heads/";

/// Branch used when the default branch cannot be determined
pub const FALLBACK_BRANCH: &str = "main";

/// Subset of the `GitRepository` resource returned by `_apis/git/repositories/{repo}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryMetadata {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub web_url: Option<String>,
    #[serde(default)]
    pub remote_url: Option<String>,
    /// Full ref, e.g. `refs/heads/main`; absent for empty repositories
    #[serde(default)]
    pub default_branch: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub is_disabled: Option<bool>,
    #[serde(default)]
    pub project: Option<ProjectReference>,
}

impl RepositoryMetadata {
    /// Default branch name with `refs/heads/` stripped, falling back to `main`
    pub fn default_branch_name(&self) -> String {
        let full = self
            .default_branch
            .as_deref()
            .unwrap_or("refs/heads/main");
        full.strip_prefix(BRANCH_REF_PREFIX)
            .unwrap_or(full)
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectReference {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Response envelope of the items endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemList {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub value: Vec<GitItem>,
}

/// One entry of a recursive item listing
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitItem {
    #[serde(default)]
    pub path: String,
    /// `blob`, `tree`, `commit` or `tag`
    #[serde(default)]
    pub git_object_type: Option<String>,
    #[serde(default)]
    pub is_folder: Option<bool>,
    #[serde(default)]
    pub object_id: Option<String>,
}

impl GitItem {
    pub fn is_blob(&self) -> bool {
        self.git_object_type.as_deref() == Some("blob")
    }

    /// Path relative to the repository root (leading `/` removed)
    pub fn relative_path(&self) -> &str {
        self.path.strip_prefix('/').unwrap_or(&self.path)
    }
}

/// File tree, README and branch of a repository in one value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryStructure {
    /// Newline-joined relative file paths
    pub file_tree: String,
    /// README text, empty when no candidate exists
    pub readme: String,
    /// Branch the structure was read from
    pub default_branch: String,
}
