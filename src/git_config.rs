//! Azure DevOps remote URL detection.
//!
//! Parses the organization/project/repository triple out of the remote URL
//! shapes Azure DevOps hands out, so the CLI can fill in connection
//! settings without being told them explicitly.

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use crate::git::GitClient;

/// Connection coordinates extracted from an Azure DevOps remote URL.
#[derive(Debug, Clone, PartialEq)]
pub struct AzureRemote {
    pub organization: String,
    pub project: String,
    pub repository: String,
}

struct RemotePatterns {
    ssh_modern: Regex,
    ssh_legacy: Regex,
    https_git: Regex,
    https_legacy: Regex,
}

static PATTERNS: OnceLock<RemotePatterns> = OnceLock::new();

fn patterns() -> &'static RemotePatterns {
    PATTERNS.get_or_init(|| RemotePatterns {
        ssh_modern: Regex::new(r"^[^@]+@ssh\.dev\.azure\.com:v3/([^/]+)/([^/]+)/([^/]+)/?$")
            .expect("Failed to compile modern SSH regex"),
        ssh_legacy: Regex::new(
            r"^[^@]+@vs-ssh\.visualstudio\.com:v3/([^/]+)/([^/]+)/([^/]+)/?$",
        )
        .expect("Failed to compile legacy SSH regex"),
        https_git: Regex::new(r"^https://[^@]*@?dev\.azure\.com/([^/]+)/([^/]+)/_git/([^/]+)/?$")
            .expect("Failed to compile HTTPS _git regex"),
        https_legacy: Regex::new(r"^https://([^.]+)\.visualstudio\.com/([^/]+)/_git/([^/]+)/?$")
            .expect("Failed to compile legacy HTTPS regex"),
    })
}

/// Parse an Azure DevOps remote URL into its connection coordinates.
///
/// Returns `None` for URLs that are not Azure DevOps remotes (GitHub,
/// GitLab, plain paths, ...).
pub fn parse_azure_remote_url(url: &str) -> Option<AzureRemote> {
    let p = patterns();
    let captures = p
        .ssh_modern
        .captures(url)
        .or_else(|| p.ssh_legacy.captures(url))
        .or_else(|| p.https_git.captures(url))
        .or_else(|| p.https_legacy.captures(url))?;

    Some(AzureRemote {
        organization: captures.get(1)?.as_str().to_string(),
        project: captures.get(2)?.as_str().to_string(),
        repository: captures.get(3)?.as_str().to_string(),
    })
}

/// Detect Azure DevOps connection coordinates from the origin remote of a
/// repository. Returns `None` when there is no origin or it does not point
/// at Azure DevOps.
pub fn detect_azure_remote(git: &GitClient) -> Option<AzureRemote> {
    let url = git.remote_url("origin").ok()?;
    let remote = parse_azure_remote_url(&url)?;
    debug!(
        organization = %remote.organization,
        project = %remote.project,
        repository = %remote.repository,
        "detected Azure DevOps remote"
    );
    Some(remote)
}
