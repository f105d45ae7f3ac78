/// Centralized platform-specific path computation
///
/// Provides consistent path handling across Windows, macOS, and Linux following
/// XDG Base Directory specification on Unix-like systems.
use std::path::PathBuf;

/// Directory name used under the platform config and cache roots
pub const APP_DIR_NAME: &str = "devops-ingest";

/// Platform-agnostic path utilities
pub struct PlatformPaths;

impl PlatformPaths {
    /// Get the appropriate cache directory for the current platform
    ///
    /// - Windows: %LOCALAPPDATA%
    /// - macOS: ~/Library/Caches
    /// - Linux/Unix: $XDG_CACHE_HOME or ~/.cache
    pub fn cache_dir() -> PathBuf {
        Self::cache_dir_from(|key| std::env::var(key).ok())
    }

    /// Get the appropriate config directory for the current platform
    ///
    /// - Windows: %APPDATA%
    /// - macOS: ~/Library/Application Support
    /// - Linux/Unix: $XDG_CONFIG_HOME or ~/.config
    pub fn config_dir() -> PathBuf {
        Self::config_dir_from(|key| std::env::var(key).ok())
    }

    fn cache_dir_from(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        platform_dir(&lookup, "LOCALAPPDATA", "Library/Caches", "XDG_CACHE_HOME", ".cache")
    }

    fn config_dir_from(lookup: impl Fn(&str) -> Option<String>) -> PathBuf {
        platform_dir(
            &lookup,
            "APPDATA",
            "Library/Application Support",
            "XDG_CONFIG_HOME",
            ".config",
        )
    }

    /// Returns: {cache_dir}/devops-ingest
    pub fn project_cache_dir() -> PathBuf {
        Self::cache_dir().join(APP_DIR_NAME)
    }

    /// Returns: {config_dir}/devops-ingest
    pub fn project_config_dir() -> PathBuf {
        Self::config_dir().join(APP_DIR_NAME)
    }

    /// Get default config file path
    ///
    /// Returns: {config_dir}/devops-ingest/config.toml
    pub fn default_config_path() -> PathBuf {
        Self::project_config_dir().join("config.toml")
    }

    /// Cache directory for one repository, keyed by its filesystem-safe slug
    ///
    /// Returns: {cache_dir}/devops-ingest/repositories/{slug}
    pub fn repository_cache_dir(slug: &str) -> PathBuf {
        Self::project_cache_dir().join("repositories").join(slug)
    }
}

fn platform_dir(
    lookup: &dyn Fn(&str) -> Option<String>,
    windows_var: &str,
    macos_suffix: &str,
    xdg_var: &str,
    home_suffix: &str,
) -> PathBuf {
    let dir = if cfg!(target_os = "windows") {
        lookup(windows_var).map(PathBuf::from)
    } else if cfg!(target_os = "macos") {
        lookup("HOME").map(|home| PathBuf::from(home).join(macos_suffix))
    } else {
        // Linux/Unix - follow XDG Base Directory specification
        lookup(xdg_var)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .or_else(|| lookup("HOME").map(|home| PathBuf::from(home).join(home_suffix)))
    };

    dir.unwrap_or_else(|| PathBuf::from("."))
}
