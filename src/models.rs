//! Request/response models for the pull-request workflow plus the CLI
//! argument definitions.

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Body of the pull-request creation POST.
///
/// Serialized with the camelCase field names the Azure DevOps REST API
/// expects. `fork_source` is omitted entirely when the branch was pushed
/// to the upstream remote rather than a fork.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PullRequestRequest {
    pub title: String,
    pub description: String,
    pub source_ref_name: String,
    pub target_ref_name: String,
    pub is_draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fork_source: Option<ForkSource>,
}

/// `forkSource` field of the creation payload: points the PR at the fork
/// repository the branch was pushed to.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForkSource {
    pub repository: ForkSourceRepository,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ForkSourceRepository {
    pub id: String,
}

impl ForkSource {
    pub fn new(repository_id: String) -> Self {
        Self {
            repository: ForkSourceRepository { id: repository_id },
        }
    }
}

/// The slice of the creation response we care about.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPullRequest {
    pub pull_request_id: i64,
    pub repository: CreatedPullRequestRepository,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPullRequestRepository {
    pub web_url: String,
}

impl CreatedPullRequest {
    /// Web URL of the created pull request.
    pub fn url(&self) -> String {
        format!(
            "{}/pullrequest/{}",
            self.repository.web_url, self.pull_request_id
        )
    }
}

/// Project metadata response; only the collection link is used.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMetadata {
    #[serde(rename = "_links", default)]
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectLinks {
    pub collection: Option<Link>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Link {
    pub href: String,
}

/// One entry of the fork list response.
///
/// `id` and `sshUrl` are optional because the fork listing can include
/// entries we cannot push to; those are treated the same as no match.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fork {
    pub id: Option<String>,
    pub name: String,
    pub ssh_url: Option<String>,
}

/// Resolved fork: the push target and the repository id to attach to the
/// pull-request payload. Discarded after use.
#[derive(Debug, Clone, PartialEq)]
pub struct ForkDetails {
    pub id: String,
    pub ssh_url: String,
}

/// CLI arguments.
#[derive(Parser, Clone, Debug)]
#[command(
    author,
    version,
    about = "Push an autofix branch and open an Azure DevOps pull request",
    long_about = "Push the current branch and open a pull request on Azure Repos.\n\n\
        The pull request title and description are taken from the subject and body\n\
        of the most recent commit. When a fork suffix is configured, the branch is\n\
        pushed to the first fork whose name ends with that suffix; if no fork\n\
        matches, autopr falls back to pushing directly to the upstream remote.\n\n\
        Configuration can be provided via CLI arguments, environment variables\n\
        (AUTOPR_*), a config file (~/.config/autopr/config.toml), or auto-detected\n\
        from the git remote.",
    after_help = "EXAMPLES:\n    \
        # Open a PR for a freshly committed autofix branch\n    \
        autopr autofix-1 -o myorg -p myproject\n\n    \
        # Draft PR against a specific target branch\n    \
        autopr autofix-1 --draft --target-branch develop\n\n    \
        # Push through a fork whose name ends in '-bot'\n    \
        autopr autofix-1 --fork-suffix -bot\n\n    \
        # Create a sample config file\n    \
        autopr --create-config"
)]
pub struct Args {
    /// Branch to push and open the pull request from
    #[arg(required_unless_present = "create_config")]
    pub branch: Option<String>,

    // Azure DevOps Connection
    /// Azure DevOps organization name
    #[arg(short, long, help_heading = "Azure DevOps Connection")]
    pub organization: Option<String>,

    /// Azure DevOps project name
    #[arg(short, long, help_heading = "Azure DevOps Connection")]
    pub project: Option<String>,

    /// Base URL of the Azure DevOps instance [default: https://dev.azure.com]
    #[arg(long, help_heading = "Azure DevOps Connection")]
    pub base_url: Option<String>,

    /// Environment variable holding the Personal Access Token
    #[arg(long, help_heading = "Azure DevOps Connection")]
    pub api_key_env: Option<String>,

    // Pull Request Options
    /// Open the pull request as a draft
    #[arg(long, help_heading = "Pull Request Options")]
    pub draft: bool,

    /// Push via the first fork whose name ends with this suffix
    #[arg(long, allow_hyphen_values = true, help_heading = "Pull Request Options")]
    pub fork_suffix: Option<String>,

    /// Branch the pull request should merge into [default: detected from origin HEAD, else main]
    #[arg(long, help_heading = "Pull Request Options")]
    pub target_branch: Option<String>,

    /// Name of the upstream remote [default: origin]
    #[arg(long, help_heading = "Pull Request Options")]
    pub remote: Option<String>,

    // Repository Options
    /// Path to the local repository [default: current directory]
    #[arg(long, help_heading = "Repository Options")]
    pub repo: Option<String>,

    /// Create a sample configuration file at ~/.config/autopr/config.toml
    #[arg(long)]
    pub create_config: bool,

    // Logging
    /// Log level: trace, debug, info, warn, error (logging off when unset)
    #[arg(long, help_heading = "Logging")]
    pub log_level: Option<String>,

    /// Write logs to this file instead of stderr
    #[arg(long, help_heading = "Logging")]
    pub log_file: Option<String>,

    /// Log format: text or json [default: text]
    #[arg(long, help_heading = "Logging")]
    pub log_format: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pull_request_request_serializes_camel_case() {
        let request = PullRequestRequest {
            title: "Bump deps".to_string(),
            description: String::new(),
            source_ref_name: "refs/heads/autofix-1".to_string(),
            target_ref_name: "refs/heads/main".to_string(),
            is_draft: false,
            fork_source: None,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(
            value,
            json!({
                "title": "Bump deps",
                "description": "",
                "sourceRefName": "refs/heads/autofix-1",
                "targetRefName": "refs/heads/main",
                "isDraft": false,
            })
        );
    }

    #[test]
    fn test_fork_source_is_omitted_when_absent() {
        let request = PullRequestRequest {
            title: "t".to_string(),
            description: "d".to_string(),
            source_ref_name: "refs/heads/b".to_string(),
            target_ref_name: "refs/heads/main".to_string(),
            is_draft: true,
            fork_source: None,
        };

        let body = serde_json::to_string(&request).unwrap();
        assert!(!body.contains("forkSource"));
        assert!(body.contains("\"isDraft\":true"));
    }

    #[test]
    fn test_fork_source_nests_repository_id() {
        let request = PullRequestRequest {
            title: "t".to_string(),
            description: "d".to_string(),
            source_ref_name: "refs/heads/b".to_string(),
            target_ref_name: "refs/heads/main".to_string(),
            is_draft: false,
            fork_source: Some(ForkSource::new("fork-id-1".to_string())),
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["forkSource"]["repository"]["id"], "fork-id-1");
    }

    #[test]
    fn test_created_pull_request_url() {
        let created: CreatedPullRequest = serde_json::from_value(json!({
            "repository": {"webUrl": "https://dev.azure.com/acme/widgets/_git/widgets"},
            "pullRequestId": 42,
        }))
        .unwrap();

        assert_eq!(
            created.url(),
            "https://dev.azure.com/acme/widgets/_git/widgets/pullrequest/42"
        );
    }

    #[test]
    fn test_created_pull_request_rejects_missing_fields() {
        let result: Result<CreatedPullRequest, _> =
            serde_json::from_value(json!({"pullRequestId": 42}));
        assert!(result.is_err());
    }

    #[test]
    fn test_fork_deserializes_with_missing_ssh_url() {
        let fork: Fork = serde_json::from_value(json!({
            "id": "abc",
            "name": "widgets-bot",
        }))
        .unwrap();

        assert_eq!(fork.name, "widgets-bot");
        assert_eq!(fork.id.as_deref(), Some("abc"));
        assert!(fork.ssh_url.is_none());
    }

    #[test]
    fn test_project_metadata_without_links() {
        let metadata: ProjectMetadata = serde_json::from_value(json!({"name": "widgets"})).unwrap();
        assert!(metadata.links.collection.is_none());
    }

    #[test]
    fn test_args_require_branch_unless_create_config() {
        use clap::error::ErrorKind;

        let err = Args::try_parse_from(["autopr"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);

        let args = Args::try_parse_from(["autopr", "--create-config"]).unwrap();
        assert!(args.create_config);
        assert!(args.branch.is_none());

        let args = Args::try_parse_from(["autopr", "autofix-1", "-o", "acme"]).unwrap();
        assert_eq!(args.branch.as_deref(), Some("autofix-1"));
        assert_eq!(args.organization.as_deref(), Some("acme"));
    }
}
