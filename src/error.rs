//! Unified error handling for the autopr library.
//!
//! This module provides the error hierarchy using `thiserror` for
//! programmatic error handling and informative error messages.
//!
//! ## Error Categories
//!
//! - [`ApiError`]: Errors from Azure DevOps API interactions
//! - [`GitError`]: Errors from git subprocess invocations
//! - [`ConfigError`]: Errors from configuration loading and validation
//!
//! `ForkNotFound` is the one error the library recovers from on its own:
//! when fork resolution fails, the publisher falls back to pushing the
//! branch directly to the upstream remote.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the autopr library.
#[derive(Error, Debug)]
pub enum AutoprError {
    /// An error occurred while interacting with the Azure DevOps API.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// An error occurred during a git operation.
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    /// An error occurred while loading or validating configuration.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// No fork of the upstream repository matched the configured name suffix.
    ///
    /// Recovered by the publisher: the branch is pushed to the upstream
    /// remote instead and the pull request carries no fork source.
    #[error("no fork with name suffix '{suffix}' found")]
    ForkNotFound {
        /// The suffix that no fork name matched.
        suffix: String,
    },

    /// A generic error for cases not covered by specific error types.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

/// Errors that can occur when interacting with the Azure DevOps API.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A network or transport level error occurred.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The resolved API key could not be turned into an authorization header.
    #[error("Invalid authorization header: {0}")]
    InvalidAuthHeader(#[from] reqwest::header::InvalidHeaderValue),

    /// The API returned a non-success status.
    #[error("API request failed with status {status}: {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body returned by the API.
        message: String,
    },

    /// The response body did not contain the expected fields.
    #[error("Malformed API response: {message}")]
    MalformedResponse {
        /// Description of what was missing or unparseable.
        message: String,
    },
}

/// Errors that can occur during git operations.
#[derive(Error, Debug, Clone)]
pub enum GitError {
    /// A git command exited with a non-zero status.
    #[error("Git command failed: {command} - {message}")]
    CommandFailed {
        /// The git command that failed.
        command: String,
        /// Stderr output from git.
        message: String,
    },

    /// A git command could not be spawned at all.
    #[error("Failed to run git: {0}")]
    Spawn(String),

    /// The remote URL has no usable trailing path segment to derive a
    /// repository slug from.
    #[error("Cannot derive repository slug from remote URL '{url}'")]
    MalformedRemoteUrl {
        /// The offending remote URL.
        url: String,
    },
}

/// Errors that can occur during configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration field is missing.
    #[error("{field} is required (use --{field}, {env_var} env var, or config file)")]
    MissingRequired {
        /// Name of the missing field.
        field: String,
        /// Environment variable name for this field.
        env_var: String,
    },

    /// Neither an inline API key nor an API key environment variable is configured.
    #[error("no API key configured (set api_key or api_key_env)")]
    MissingApiKey,

    /// The configured API key environment variable is unset or empty.
    #[error("API key environment variable {name} is not set or empty")]
    ApiKeyEnvMissing {
        /// Name of the environment variable.
        name: String,
    },

    /// Failed to read the configuration file.
    #[error("Failed to read config file at {path}: {message}")]
    FileReadError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to parse the configuration file.
    #[error("Failed to parse config file at {path}: {message}")]
    ParseError {
        /// Path to the config file.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Failed to write the configuration file.
    #[error("Failed to write config file at {path}: {message}")]
    FileWriteError {
        /// Path to the config file.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Failed to create the config directory.
    #[error("Failed to create config directory at {path}: {message}")]
    DirectoryCreationError {
        /// Path where directory creation failed.
        path: PathBuf,
        /// Error message.
        message: String,
    },
}

/// Type alias for Results using AutoprError.
pub type AutoprResult<T> = std::result::Result<T, AutoprError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let request_failed = ApiError::RequestFailed {
            status: 500,
            message: "Internal Server Error".to_string(),
        };
        assert!(request_failed.to_string().contains("500"));
        assert!(request_failed.to_string().contains("Internal Server Error"));

        let malformed = ApiError::MalformedResponse {
            message: "missing pullRequestId".to_string(),
        };
        assert!(malformed.to_string().contains("missing pullRequestId"));
    }

    #[test]
    fn test_git_error_display() {
        let failed = GitError::CommandFailed {
            command: "git push origin HEAD:autofix-1 --quiet".to_string(),
            message: "non-fast-forward".to_string(),
        };
        assert!(failed.to_string().contains("git push"));
        assert!(failed.to_string().contains("non-fast-forward"));

        let malformed = GitError::MalformedRemoteUrl {
            url: "nonsense".to_string(),
        };
        assert!(malformed.to_string().contains("nonsense"));
    }

    #[test]
    fn test_config_error_display() {
        let missing = ConfigError::MissingRequired {
            field: "organization".to_string(),
            env_var: "AUTOPR_ORGANIZATION".to_string(),
        };
        let msg = missing.to_string();
        assert!(msg.contains("organization"));
        assert!(msg.contains("AUTOPR_ORGANIZATION"));
        assert!(msg.contains("--organization"));

        let env_missing = ConfigError::ApiKeyEnvMissing {
            name: "AZURE_PAT".to_string(),
        };
        assert!(env_missing.to_string().contains("AZURE_PAT"));
    }

    #[test]
    fn test_error_conversion() {
        let api_error = ApiError::MalformedResponse {
            message: "bad".to_string(),
        };
        let err: AutoprError = api_error.into();
        assert!(matches!(err, AutoprError::Api(_)));

        let git_error = GitError::MalformedRemoteUrl {
            url: "x".to_string(),
        };
        let err: AutoprError = git_error.into();
        assert!(matches!(err, AutoprError::Git(_)));

        let config_error = ConfigError::MissingApiKey;
        let err: AutoprError = config_error.into();
        assert!(matches!(err, AutoprError::Config(_)));
    }

    #[test]
    fn test_fork_not_found_is_distinguishable() {
        let err = AutoprError::ForkNotFound {
            suffix: "-autofix".to_string(),
        };
        assert!(matches!(err, AutoprError::ForkNotFound { .. }));
        assert!(err.to_string().contains("-autofix"));
    }
}
