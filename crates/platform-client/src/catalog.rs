//! SLX catalog, index status, task search and workspace config endpoints

use reqwest::StatusCode;
use rw_core::model::{Slx, SlxList, TaskSearchResult};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::Result;
use crate::transport::PlatformClient;

/// Result of the index-status lookup
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStatus {
    pub http_status: u16,
    pub body: Value,
}

impl IndexStatus {
    /// The `status` field of the body, if any
    pub fn state(&self) -> Option<&str> {
        self.body.get("status").and_then(|v| v.as_str())
    }

    /// Indexing has finished and search results are trustworthy
    pub fn is_ready(&self) -> bool {
        self.http_status == StatusCode::OK.as_u16() && self.state() == Some("completed")
    }
}

impl PlatformClient {
    /// Every SLX in the workspace
    pub async fn list_slxs(&self) -> Result<Vec<Slx>> {
        let value = self.get_json(&self.workspace_path("/slxs")).await?;
        let list: SlxList = serde_json::from_value(value)?;
        Ok(list.into_vec())
    }

    /// SLXs carrying the tag pair. Lookup failures yield an empty list.
    pub async fn slxs_with_tag(&self, tag_name: &str, tag_value: &str) -> Vec<Slx> {
        match self.list_slxs().await {
            Ok(slxs) => {
                let matched: Vec<Slx> = slxs
                    .into_iter()
                    .filter(|slx| slx.has_tag(tag_name, tag_value))
                    .collect();
                debug!(
                    "{} SLXs tagged {}={}",
                    matched.len(),
                    tag_name,
                    tag_value
                );
                matched
            }
            Err(err) => {
                warn!(
                    "SLX lookup for tag {}={} failed, treating as no matches: {}",
                    tag_name, tag_value, err
                );
                Vec::new()
            }
        }
    }

    pub async fn slx_names_with_tag(&self, tag_name: &str, tag_value: &str) -> Vec<String> {
        self.slxs_with_tag(tag_name, tag_value)
            .await
            .into_iter()
            .map(|slx| slx.name)
            .collect()
    }

    pub async fn index_status(&self) -> Result<IndexStatus> {
        let (status, body) = self
            .get_with_status(&self.workspace_path("/index-status"))
            .await?;
        Ok(IndexStatus {
            http_status: status.as_u16(),
            body,
        })
    }

    /// Run a natural-language task search
    pub async fn task_search(&self, query: &str) -> Result<TaskSearchResult> {
        let value = self
            .post_json(
                &self.workspace_path("/task-search"),
                &json!({ "query": query }),
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// The workspace's `workspace.yaml` on the main branch, as JSON
    pub async fn workspace_config(&self) -> Result<Value> {
        Ok(self
            .get_json(&self.workspace_path("/branches/main/workspace.yaml?format=json"))
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformConfig;
    use httpmock::prelude::*;

    fn client_for(server: &MockServer) -> PlatformClient {
        PlatformClient::new(PlatformConfig::new(server.base_url(), "ws", "tok").unwrap())
    }

    fn slx_listing() -> Value {
        json!({
            "results": [
                { "name": "ws--api", "spec": { "tags": [{ "name": "team", "value": "payments" }] } },
                { "name": "ws--db", "spec": { "tags": [{ "name": "team", "value": "storage" }] } },
                { "name": "ws--queue", "spec": { "tags": [
                    { "name": "env", "value": "prod" },
                    { "name": "team", "value": "payments" }
                ] } }
            ]
        })
    }

    #[tokio::test]
    async fn test_slx_names_with_tag_filters() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/workspaces/ws/slxs");
            then.status(200).json_body(slx_listing());
        });

        let client = client_for(&server);
        let names = client.slx_names_with_tag("team", "payments").await;

        mock.assert();
        assert_eq!(names, vec!["ws--api", "ws--queue"]);
    }

    #[tokio::test]
    async fn test_slx_lookup_failure_returns_empty() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/workspaces/ws/slxs");
            then.status(500).body("boom");
        });

        let client = client_for(&server);
        assert!(client.slxs_with_tag("team", "payments").await.is_empty());
        assert!(client.list_slxs().await.is_err());
    }

    #[tokio::test]
    async fn test_index_status_reports_readiness() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/workspaces/ws/index-status");
            then.status(200).json_body(json!({ "status": "completed" }));
        });

        let status = client_for(&server).index_status().await.unwrap();
        assert_eq!(status.http_status, 200);
        assert_eq!(status.state(), Some("completed"));
        assert!(status.is_ready());
    }

    #[test]
    fn test_index_status_not_ready_on_error_status() {
        let status = IndexStatus {
            http_status: 404,
            body: json!({ "status": "completed" }),
        };
        assert!(!status.is_ready());
    }

    #[tokio::test]
    async fn test_task_search_posts_query() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/workspaces/ws/task-search")
                .json_body(json!({ "query": "checkout latency" }));
            then.status(200).json_body(json!({
                "tasks": [{ "score": 0.8, "slxShortName": "api", "taskName": "Check pods" }]
            }));
        });

        let result = client_for(&server)
            .task_search("checkout latency")
            .await
            .unwrap();

        mock.assert();
        assert_eq!(result.tasks.len(), 1);
        assert_eq!(result.tasks[0].target(), Some("api"));
    }

    #[tokio::test]
    async fn test_workspace_config_requests_json_format() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/workspaces/ws/branches/main/workspace.yaml")
                .query_param("format", "json");
            then.status(200)
                .json_body(json!({ "kind": "Workspace", "spec": { "owners": ["ops@example.com"] } }));
        });

        let config = client_for(&server).workspace_config().await.unwrap();

        mock.assert();
        assert_eq!(config["kind"], "Workspace");
    }
}
