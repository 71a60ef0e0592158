//! Configuration management for autopr.
//!
//! Configuration is assembled from multiple sources with the precedence
//! CLI arguments > environment variables > config file > git remote
//! detection > built-in defaults:
//!
//! - TOML configuration file following the XDG Base Directory specification
//!   (`~/.config/autopr/config.toml`)
//! - `AUTOPR_*` environment variables
//! - Azure DevOps coordinates auto-detected from the origin remote
//!
//! The accumulated [`Config`] is validated into an immutable [`Settings`]
//! record before use. `Settings` keeps the API key in a `SecretString` and
//! masks it in its Debug representation.

use secrecy::SecretString;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{error::ConfigError, git::GitClient, git_config, models::Args};

/// Temporary struct for deserializing the TOML configuration file.
#[derive(Debug, Clone, Deserialize, Default)]
struct ConfigFile {
    pub organization: Option<String>,
    pub project: Option<String>,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    pub draft: Option<bool>,
    pub fork_suffix: Option<String>,
    pub target_branch: Option<String>,
    pub remote: Option<String>,
}

/// Partial configuration accumulated from one source.
///
/// Merge instances from the various sources, then resolve with
/// [`Config::into_settings`].
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Azure DevOps organization name.
    pub organization: Option<String>,
    /// Azure DevOps project name.
    pub project: Option<String>,
    /// Base URL of the Azure DevOps instance.
    pub base_url: Option<String>,
    /// Inline API key (prefer `api_key_env` to keep secrets out of files).
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    /// Open pull requests as drafts.
    pub draft: Option<bool>,
    /// Push via the first fork whose name ends with this suffix; empty
    /// means pushing straight to the upstream remote.
    pub fork_suffix: Option<String>,
    /// Branch the pull request should merge into.
    pub target_branch: Option<String>,
    /// Name of the upstream remote.
    pub remote: Option<String>,
}

impl Config {
    /// Built-in defaults, the lowest-precedence layer.
    pub fn defaults() -> Self {
        Self {
            base_url: Some("https://dev.azure.com".to_string()),
            draft: Some(false),
            fork_suffix: Some(String::new()),
            remote: Some("origin".to_string()),
            ..Self::default()
        }
    }

    /// Load configuration from the XDG config directory.
    ///
    /// A missing file is not an error; it yields an empty layer.
    pub fn load_from_file() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|e| ConfigError::FileReadError {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        let file: ConfigFile = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        Ok(Self {
            organization: file.organization,
            project: file.project,
            base_url: file.base_url,
            api_key: file.api_key,
            api_key_env: file.api_key_env,
            draft: file.draft,
            fork_suffix: file.fork_suffix,
            target_branch: file.target_branch,
            remote: file.remote,
        })
    }

    /// Load configuration from `AUTOPR_*` environment variables.
    pub fn load_from_env() -> Self {
        Self {
            organization: std::env::var("AUTOPR_ORGANIZATION").ok(),
            project: std::env::var("AUTOPR_PROJECT").ok(),
            base_url: std::env::var("AUTOPR_BASE_URL").ok(),
            api_key: std::env::var("AUTOPR_API_KEY").ok(),
            api_key_env: std::env::var("AUTOPR_API_KEY_ENV").ok(),
            draft: std::env::var("AUTOPR_DRAFT")
                .ok()
                .and_then(|s| s.parse::<bool>().ok()),
            fork_suffix: std::env::var("AUTOPR_FORK_SUFFIX").ok(),
            target_branch: std::env::var("AUTOPR_TARGET_BRANCH").ok(),
            remote: std::env::var("AUTOPR_REMOTE").ok(),
        }
    }

    /// Detect organization and project from the repository's origin remote.
    ///
    /// Only fills fields for Azure DevOps remotes; everything else yields
    /// an empty layer.
    pub fn detect_from_git_remote<P: AsRef<Path>>(repo_path: P) -> Self {
        let git = GitClient::new(repo_path);
        match git_config::detect_azure_remote(&git) {
            Some(remote) => Self {
                organization: Some(remote.organization),
                project: Some(remote.project),
                ..Self::default()
            },
            None => Self::default(),
        }
    }

    /// Build a configuration layer from CLI arguments.
    pub fn from_args(args: &Args) -> Self {
        Self {
            organization: args.organization.clone(),
            project: args.project.clone(),
            base_url: args.base_url.clone(),
            // No --api-key flag: secrets do not belong in argv.
            api_key: None,
            api_key_env: args.api_key_env.clone(),
            draft: args.draft.then_some(true),
            fork_suffix: args.fork_suffix.clone(),
            target_branch: args.target_branch.clone(),
            remote: args.remote.clone(),
        }
    }

    /// Merge this config with another, preferring values from `other` when
    /// they exist.
    pub fn merge(self, other: Self) -> Self {
        Self {
            organization: other.organization.or(self.organization),
            project: other.project.or(self.project),
            base_url: other.base_url.or(self.base_url),
            api_key: other.api_key.or(self.api_key),
            api_key_env: other.api_key_env.or(self.api_key_env),
            draft: other.draft.or(self.draft),
            fork_suffix: other.fork_suffix.or(self.fork_suffix),
            target_branch: other.target_branch.or(self.target_branch),
            remote: other.remote.or(self.remote),
        }
    }

    /// Validate the accumulated configuration into immutable [`Settings`].
    pub fn into_settings(self) -> Result<Settings, ConfigError> {
        let organization = require(self.organization, "organization", "AUTOPR_ORGANIZATION")?;
        let project = require(self.project, "project", "AUTOPR_PROJECT")?;
        let base_url = require(self.base_url, "base_url", "AUTOPR_BASE_URL")?;

        Ok(Settings {
            organization,
            project,
            // The PR creation URL is built by joining path segments onto this.
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: self.api_key.map(SecretString::from),
            api_key_env: self.api_key_env,
            draft: self.draft.unwrap_or(false),
            fork_suffix: self.fork_suffix.unwrap_or_default(),
            target_branch: self.target_branch,
            remote: self.remote.unwrap_or_else(|| "origin".to_string()),
        })
    }

    /// Create a sample config file for user reference. Never overwrites an
    /// existing file.
    pub fn create_sample_config() -> Result<(), ConfigError> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            return Ok(());
        }

        let sample_config = r#"# autopr Configuration File
# Location: ~/.config/autopr/config.toml (Linux/macOS, per XDG Base Directory spec)

# Azure DevOps organization (required)
# organization = "your-organization"

# Azure DevOps project (required)
# project = "your-project"

# Base URL of the Azure DevOps instance (optional)
base_url = "https://dev.azure.com"

# Personal Access Token. Prefer api_key_env over an inline key.
# api_key = "your-pat-token"
# api_key_env = "AZURE_DEVOPS_PAT"

# Open pull requests as drafts (optional, defaults to false)
draft = false

# Push via the first fork whose name ends with this suffix.
# Leave empty to push straight to the upstream remote.
fork_suffix = ""

# Branch the pull request should merge into.
# Detected from origin HEAD when unset, falling back to "main".
# target_branch = "main"

# Name of the upstream remote (optional, defaults to "origin")
remote = "origin"
"#;

        fs::write(&config_path, sample_config).map_err(|e| ConfigError::FileWriteError {
            path: config_path.clone(),
            message: e.to_string(),
        })?;

        println!("Sample config created at: {}", config_path.display());
        Ok(())
    }

    /// Get the XDG config file path for autopr, creating the directory if
    /// needed.
    fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .expect("Could not determine home directory")
                    .join(".config")
            });

        let autopr_config_dir = config_dir.join("autopr");

        if !autopr_config_dir.exists() {
            fs::create_dir_all(&autopr_config_dir).map_err(|e| {
                ConfigError::DirectoryCreationError {
                    path: autopr_config_dir.clone(),
                    message: e.to_string(),
                }
            })?;
        }

        Ok(autopr_config_dir.join("config.toml"))
    }
}

fn require(value: Option<String>, field: &str, env_var: &str) -> Result<String, ConfigError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ConfigError::MissingRequired {
            field: field.to_string(),
            env_var: env_var.to_string(),
        }),
    }
}

/// Immutable, validated configuration for a single publish invocation.
#[derive(Clone)]
pub struct Settings {
    pub organization: String,
    pub project: String,
    pub base_url: String,
    pub api_key: Option<SecretString>,
    pub api_key_env: Option<String>,
    pub draft: bool,
    pub fork_suffix: String,
    pub target_branch: Option<String>,
    pub remote: String,
}

// Explicit impl so the API key can never end up in logs or error chains.
impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_key_env", &self.api_key_env)
            .field("draft", &self.draft)
            .field("fork_suffix", &self.fork_suffix)
            .field("target_branch", &self.target_branch)
            .field("remote", &self.remote)
            .finish()
    }
}
