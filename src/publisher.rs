//! Pull-request publishing.
//!
//! Ties the pieces together: read the HEAD commit, push the branch
//! (optionally via a fork), create the pull request, and hand back its web
//! URL. One invocation publishes exactly one branch; the branch is always
//! pushed before the creation request is issued.

use tracing::{debug, info};

use crate::{
    api::AzureReposClient,
    config::Settings,
    error::AutoprError,
    fork,
    git::{GitClient, repo_slug_from_remote_url},
    models::{ForkSource, PullRequestRequest},
};

/// Name registered for the fork remote when pushing through a fork.
const FORK_REMOTE: &str = "fork";

/// Publishes the current branch as a pull request.
pub struct PullRequestPublisher {
    settings: Settings,
    git: GitClient,
}

impl PullRequestPublisher {
    pub fn new(settings: Settings, git: GitClient) -> Self {
        Self { settings, git }
    }

    /// Push `branch_name` and open a pull request for it, returning the
    /// pull request's web URL.
    ///
    /// With a configured fork suffix, the branch is pushed to the matching
    /// fork and the payload carries the fork repository id; when no fork
    /// matches, the push falls back to the upstream remote. Not idempotent:
    /// a second call creates a second pull request or fails, depending on
    /// provider state.
    pub async fn publish(&self, branch_name: &str) -> Result<String, AutoprError> {
        let remote_url = self.git.remote_url(&self.settings.remote)?;
        let repo_slug = repo_slug_from_remote_url(&remote_url)?;

        let title = self.git.head_subject()?.trim().to_string();
        let description = self.git.head_body()?.trim().to_string();
        let target_branch = self
            .git
            .target_branch(self.settings.target_branch.as_deref());

        let mut request = PullRequestRequest {
            title,
            description,
            source_ref_name: format!("refs/heads/{}", branch_name),
            target_ref_name: format!("refs/heads/{}", target_branch),
            is_draft: self.settings.draft,
            fork_source: None,
        };

        let client = AzureReposClient::new(&self.settings)?;

        if self.settings.fork_suffix.is_empty() {
            self.git.push(&self.settings.remote, branch_name)?;
        } else {
            match fork::resolve_fork(&client, &repo_slug, &self.settings.fork_suffix).await {
                Ok(fork) => {
                    debug!(fork_id = %fork.id, "pushing via fork");
                    self.git.add_remote(FORK_REMOTE, &fork.ssh_url)?;
                    self.git.push(FORK_REMOTE, branch_name)?;
                    request.fork_source = Some(ForkSource::new(fork.id));
                }
                Err(AutoprError::ForkNotFound { suffix }) => {
                    // Deliberate degradation, not a failure.
                    debug!(%suffix, "no matching fork, pushing to upstream instead");
                    self.git.push(&self.settings.remote, branch_name)?;
                }
                Err(e) => return Err(e),
            }
        }

        let created = client.create_pull_request(&repo_slug, &request).await?;
        let url = created.url();
        info!(pull_request_id = created.pull_request_id, %url, "pull request created");
        Ok(url)
    }
}
