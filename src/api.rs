//! Azure DevOps REST client for the pull-request workflow.
//!
//! Only the three endpoints the publisher needs are modeled: pull-request
//! creation, project metadata (for the collection id), and the fork list.
//! All requests carry Basic auth with an empty username and the API key as
//! password, pinned at `api-version=6.0`.

use reqwest::{Client, header::HeaderMap};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::{
    config::Settings,
    credential,
    error::{ApiError, AutoprError},
    models::{CreatedPullRequest, Fork, ProjectMetadata, PullRequestRequest},
};

const API_VERSION: &str = "6.0";

/// Authenticated client scoped to one organization/project.
#[derive(Debug, Clone)]
pub struct AzureReposClient {
    client: Client,
    base_url: String,
    organization: String,
    project: String,
}

impl AzureReposClient {
    /// Build a client from validated settings. Resolves the API key and
    /// bakes the authorization header into every request.
    pub fn new(settings: &Settings) -> Result<Self, AutoprError> {
        let auth = credential::basic_auth_value(settings)?;

        let client = Client::builder()
            .default_headers({
                let mut headers = HeaderMap::new();
                headers.insert(
                    reqwest::header::AUTHORIZATION,
                    reqwest::header::HeaderValue::from_str(&format!("Basic {}", auth))
                        .map_err(ApiError::from)?,
                );
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(ApiError::from)?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            organization: settings.organization.clone(),
            project: settings.project.clone(),
        })
    }

    /// Open a pull request on the given repository.
    pub async fn create_pull_request(
        &self,
        repo_slug: &str,
        request: &PullRequestRequest,
    ) -> Result<CreatedPullRequest, ApiError> {
        let url = format!(
            "{}/{}/{}/_apis/git/repositories/{}/pullrequests?api-version={}",
            self.base_url, self.organization, self.project, repo_slug, API_VERSION
        );
        debug!(%url, source = %request.source_ref_name, "creating pull request");

        let response = self.client.post(&url).json(request).send().await?;
        read_json(response).await
    }

    /// Project metadata; the caller digs the collection id out of
    /// `_links.collection.href`.
    pub async fn get_project(&self) -> Result<ProjectMetadata, ApiError> {
        let url = format!(
            "{}/{}/_apis/projects/{}?api-version={}",
            self.base_url, self.organization, self.project, API_VERSION
        );
        debug!(%url, "fetching project metadata");

        let response = self.client.get(&url).send().await?;
        read_json(response).await
    }

    /// Forks of the given repository within a collection, in API order.
    pub async fn list_forks(
        &self,
        repo_slug: &str,
        collection_id: &str,
    ) -> Result<Vec<Fork>, ApiError> {
        let url = format!(
            "{}/{}/{}/_apis/git/repositories/{}/forks/{}?api-version={}",
            self.base_url, self.organization, self.project, repo_slug, collection_id, API_VERSION
        );
        debug!(%url, "listing forks");

        #[derive(Deserialize)]
        struct ForkListResponse {
            value: Vec<Fork>,
        }

        let response = self.client.get(&url).send().await?;
        let forks: ForkListResponse = read_json(response).await?;
        Ok(forks.value)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::RequestFailed {
            status: status.as_u16(),
            message: text,
        });
    }

    serde_json::from_str(&text).map_err(|e| ApiError::MalformedResponse {
        message: e.to_string(),
    })
}
