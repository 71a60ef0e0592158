//! Git subprocess client.
//!
//! All git interaction goes through external `git` commands; nothing links
//! against libgit2. Failures carry the invoked command line and git's
//! stderr output.

use std::{
    path::{Path, PathBuf},
    process::Command,
};
use tracing::debug;

use crate::error::GitError;

/// Runs git commands in a fixed working directory.
#[derive(Debug, Clone)]
pub struct GitClient {
    repo_path: PathBuf,
}

impl GitClient {
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
        }
    }

    /// Path the client runs git in.
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// URL of the given remote, as reported by `git remote get-url`.
    pub fn remote_url(&self, remote: &str) -> Result<String, GitError> {
        let output = self.run(&["remote", "get-url", remote])?;
        Ok(output.trim().to_string())
    }

    /// Subject line (`%s`) of the HEAD commit.
    pub fn head_subject(&self) -> Result<String, GitError> {
        self.run(&["log", "-1", "--format=%s"])
    }

    /// Body (`%b`) of the HEAD commit. Empty when the commit has no body.
    pub fn head_body(&self) -> Result<String, GitError> {
        self.run(&["log", "-1", "--format=%b"])
    }

    /// Push HEAD to `branch` on `remote`.
    pub fn push(&self, remote: &str, branch: &str) -> Result<(), GitError> {
        let refspec = format!("HEAD:{}", branch);
        self.run(&["push", remote, &refspec, "--quiet"])?;
        Ok(())
    }

    /// Register an additional remote.
    pub fn add_remote(&self, name: &str, url: &str) -> Result<(), GitError> {
        self.run(&["remote", "add", name, url])?;
        Ok(())
    }

    /// Branch the pull request should merge into.
    ///
    /// An explicitly configured branch wins. Otherwise the default branch
    /// is read from `refs/remotes/origin/HEAD` (set by clone), falling back
    /// to `main` when that ref does not exist.
    pub fn target_branch(&self, configured: Option<&str>) -> String {
        if let Some(branch) = configured {
            return branch.to_string();
        }

        if let Ok(symref) = self.run(&["symbolic-ref", "refs/remotes/origin/HEAD"])
            && let Some(branch) = symref.trim().strip_prefix("refs/remotes/origin/")
            && !branch.is_empty()
        {
            return branch.to_string();
        }

        "main".to_string()
    }

    fn run(&self, args: &[&str]) -> Result<String, GitError> {
        debug!(command = %format!("git {}", args.join(" ")), "running git");

        let output = Command::new("git")
            .current_dir(&self.repo_path)
            .args(args)
            .output()
            .map_err(|e| GitError::Spawn(e.to_string()))?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Derive the repository slug from a remote URL.
///
/// The slug is the final `/`-delimited path segment, e.g.
/// `https://dev.azure.com/org/project/_git/myrepo` -> `myrepo`. A URL with
/// no non-empty trailing segment cannot name a repository.
pub fn repo_slug_from_remote_url(url: &str) -> Result<String, GitError> {
    match url.rsplit_once('/') {
        Some((_, slug)) if !slug.is_empty() => Ok(slug.to_string()),
        _ => Err(GitError::MalformedRemoteUrl {
            url: url.to_string(),
        }),
    }
}
