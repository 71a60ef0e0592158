//! Fork resolution.
//!
//! When a fork suffix is configured, the publisher pushes the branch to a
//! server-side fork of the upstream repository instead of the upstream
//! itself. The fork is found by listing the upstream's forks (which
//! requires the organization's collection id, taken from the project
//! metadata) and scanning for the first one whose name ends with the
//! suffix.

use tracing::debug;

use crate::{
    api::AzureReposClient,
    error::{ApiError, AutoprError},
    models::ForkDetails,
};

/// Resolve the fork to push to.
///
/// The scan is a plain linear pass over the list in the order the API
/// returned it; the first name-suffix match wins. When several forks match,
/// provider ordering decides, which is accepted behavior. Returns
/// [`AutoprError::ForkNotFound`] when nothing matches or the first match
/// has no id or SSH URL to push to.
pub async fn resolve_fork(
    client: &AzureReposClient,
    repo_slug: &str,
    fork_suffix: &str,
) -> Result<ForkDetails, AutoprError> {
    let metadata = client.get_project().await.map_err(AutoprError::from)?;
    let collection_href = metadata
        .links
        .collection
        .ok_or_else(|| ApiError::MalformedResponse {
            message: "project metadata has no collection link".to_string(),
        })?
        .href;
    let collection_id = collection_href
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string();

    let forks = client.list_forks(repo_slug, &collection_id).await?;
    debug!(count = forks.len(), %collection_id, "scanning forks");

    let matched = forks
        .into_iter()
        .find(|fork| fork.name.ends_with(fork_suffix));

    let not_found = || AutoprError::ForkNotFound {
        suffix: fork_suffix.to_string(),
    };

    let fork = matched.ok_or_else(not_found)?;
    let id = fork.id.filter(|id| !id.is_empty()).ok_or_else(not_found)?;
    let ssh_url = fork
        .ssh_url
        .filter(|url| !url.is_empty())
        .ok_or_else(not_found)?;

    Ok(ForkDetails { id, ssh_url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, Settings};
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::{Value, json};

    fn test_settings(base_url: &str) -> Settings {
        Config {
            organization: Some("acme".to_string()),
            project: Some("widgets".to_string()),
            base_url: Some(base_url.to_string()),
            api_key: Some("secret".to_string()),
            ..Config::defaults()
        }
        .into_settings()
        .unwrap()
    }

    async fn mock_project(server: &mut ServerGuard) {
        server
            .mock("GET", "/acme/_apis/projects/widgets")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "_links": {
                        "collection": {
                            "href": "https://dev.azure.com/_apis/projectCollections/coll-123"
                        }
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;
    }

    async fn mock_forks(server: &mut ServerGuard, value: Value) {
        server
            .mock(
                "GET",
                "/acme/widgets/_apis/git/repositories/widgets/forks/coll-123",
            )
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({ "value": value }).to_string())
            .create_async()
            .await;
    }

    #[tokio::test]
    async fn test_first_suffix_match_wins() {
        let mut server = Server::new_async().await;
        mock_project(&mut server).await;
        mock_forks(
            &mut server,
            json!([
                {"id": "f1", "name": "widgets-alice", "sshUrl": "git@host:alice/widgets"},
                {"id": "f2", "name": "widgets-bot", "sshUrl": "git@host:bot/widgets"},
                {"id": "f3", "name": "other-bot", "sshUrl": "git@host:other/widgets"},
            ]),
        )
        .await;

        let client = AzureReposClient::new(&test_settings(&server.url())).unwrap();
        let fork = resolve_fork(&client, "widgets", "-bot").await.unwrap();

        assert_eq!(
            fork,
            ForkDetails {
                id: "f2".to_string(),
                ssh_url: "git@host:bot/widgets".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_no_match_is_fork_not_found() {
        let mut server = Server::new_async().await;
        mock_project(&mut server).await;
        mock_forks(
            &mut server,
            json!([
                {"id": "f1", "name": "widgets-alice", "sshUrl": "git@host:alice/widgets"},
            ]),
        )
        .await;

        let client = AzureReposClient::new(&test_settings(&server.url())).unwrap();
        let err = resolve_fork(&client, "widgets", "-bot").await.unwrap_err();

        assert!(matches!(err, AutoprError::ForkNotFound { .. }));
    }

    #[tokio::test]
    async fn test_empty_fork_list_is_fork_not_found() {
        let mut server = Server::new_async().await;
        mock_project(&mut server).await;
        mock_forks(&mut server, json!([])).await;

        let client = AzureReposClient::new(&test_settings(&server.url())).unwrap();
        let err = resolve_fork(&client, "widgets", "-bot").await.unwrap_err();

        assert!(matches!(err, AutoprError::ForkNotFound { .. }));
    }

    #[tokio::test]
    async fn test_match_without_ssh_url_is_fork_not_found() {
        let mut server = Server::new_async().await;
        mock_project(&mut server).await;
        mock_forks(
            &mut server,
            json!([
                {"id": "f1", "name": "widgets-bot"},
            ]),
        )
        .await;

        let client = AzureReposClient::new(&test_settings(&server.url())).unwrap();
        let err = resolve_fork(&client, "widgets", "-bot").await.unwrap_err();

        assert!(matches!(err, AutoprError::ForkNotFound { .. }));
    }

    #[tokio::test]
    async fn test_match_with_empty_id_is_fork_not_found() {
        let mut server = Server::new_async().await;
        mock_project(&mut server).await;
        mock_forks(
            &mut server,
            json!([
                {"id": "", "name": "widgets-bot", "sshUrl": "git@host:bot/widgets"},
            ]),
        )
        .await;

        let client = AzureReposClient::new(&test_settings(&server.url())).unwrap();
        let err = resolve_fork(&client, "widgets", "-bot").await.unwrap_err();

        assert!(matches!(err, AutoprError::ForkNotFound { .. }));
    }

    #[tokio::test]
    async fn test_missing_collection_link_is_malformed_response() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/acme/_apis/projects/widgets")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"id": "proj-1"}).to_string())
            .create_async()
            .await;

        let client = AzureReposClient::new(&test_settings(&server.url())).unwrap();
        let err = resolve_fork(&client, "widgets", "-bot").await.unwrap_err();

        assert!(matches!(
            err,
            AutoprError::Api(ApiError::MalformedResponse { .. })
        ));
    }
}
