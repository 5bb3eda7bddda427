//! RunSession endpoints

use rw_core::mapper::{build_runsession_request, MapperOptions, RunSessionCreate};
use rw_core::model::RunSession;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::config::PollSettings;
use crate::error::Result;
use crate::poller::StabilizationPoller;
use crate::transport::PlatformClient;

fn generated_session_name() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("systest-{}", &id[..8])
}

impl PlatformClient {
    pub async fn fetch_runsession(&self, session_id: i64) -> Result<RunSession> {
        let path = self.workspace_path(&format!("/runsessions/{}", session_id));
        let value = self.get_json(&path).await?;
        Ok(RunSession::from_value(value)?)
    }

    /// Create a RunSession and return the server's decoded response
    pub async fn create_runsession(&self, request: &RunSessionCreate) -> Result<Value> {
        let value = self
            .post_json(&self.workspace_path("/runsessions"), request)
            .await?;
        info!(
            "Created RunSession {} with {} run requests",
            value.get("id").map(|v| v.to_string()).unwrap_or_default(),
            request.run_requests.len()
        );
        Ok(value)
    }

    /// Search for tasks matching `query` and start a RunSession from the hits.
    ///
    /// Returns `Ok(None)` without creating anything when the search found no
    /// tasks.
    pub async fn create_runsession_from_query(
        &self,
        query: &str,
        persona_short_name: &str,
        score_threshold: f64,
    ) -> Result<Option<Value>> {
        let result = self.task_search(query).await?;
        let options = MapperOptions::new(self.config().workspace.clone(), persona_short_name)
            .with_score_threshold(score_threshold);

        let Some(request) =
            build_runsession_request(&result, query, generated_session_name(), &options)
        else {
            info!("Task search for '{}' returned no tasks, no RunSession created", query);
            return Ok(None);
        };

        self.create_runsession(&request).await.map(Some)
    }

    /// Block until the session's request list stops growing
    pub async fn wait_for_runsession(
        &self,
        session_id: i64,
        settings: PollSettings,
    ) -> Result<RunSession> {
        StabilizationPoller::new(settings)?
            .wait_until_stable(self, session_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlatformConfig;
    use crate::error::ClientError;
    use httpmock::prelude::*;
    use rw_core::mapper::DEFAULT_SCORE_THRESHOLD;
    use serde_json::json;

    fn client_for(server: &MockServer) -> PlatformClient {
        PlatformClient::new(PlatformConfig::new(server.base_url(), "ws", "tok").unwrap())
    }

    #[tokio::test]
    async fn test_fetch_runsession_decodes_document() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/workspaces/ws/runsessions/12");
            then.status(200).json_body(json!({
                "id": 12,
                "runRequests": [{ "slxName": "ws--api", "issues": [{ "closed": false }] }],
                "personaShortName": "eager-edgar",
                "active": true
            }));
        });

        let session = client_for(&server).fetch_runsession(12).await.unwrap();
        assert_eq!(session.id, Some(12));
        assert_eq!(session.run_request_count(), 1);
        assert_eq!(session.persona_short_name.as_deref(), Some("eager-edgar"));
    }

    #[tokio::test]
    async fn test_create_from_query_posts_grouped_requests() {
        let server = MockServer::start_async().await;
        let search = server.mock(|when, then| {
            when.method(POST).path("/workspaces/ws/task-search");
            then.status(200).json_body(json!({
                "tasks": [
                    { "score": 0.9, "workspaceTask": { "slxShortName": "api", "unresolvedTitle": "Check pods" } },
                    { "score": 0.1, "workspaceTask": { "slxShortName": "db", "unresolvedTitle": "Check locks" } }
                ]
            }));
        });
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/workspaces/ws/runsessions")
                .header("authorization", "Bearer tok")
                .body_includes("\"slxName\":\"ws--api\"")
                .body_includes("\"fromSearchQuery\":\"pods restarting\"")
                .body_includes("\"personaShortName\":\"eager-edgar\"");
            then.status(201).json_body(json!({ "id": 99, "runRequests": [] }));
        });

        let created = client_for(&server)
            .create_runsession_from_query("pods restarting", "eager-edgar", DEFAULT_SCORE_THRESHOLD)
            .await
            .unwrap()
            .unwrap();

        search.assert();
        create.assert();
        assert_eq!(created["id"], 99);
    }

    #[tokio::test]
    async fn test_empty_search_creates_nothing() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/workspaces/ws/task-search");
            then.status(200).json_body(json!({ "tasks": [] }));
        });
        let create = server.mock(|when, then| {
            when.method(POST).path("/workspaces/ws/runsessions");
            then.status(201).json_body(json!({ "id": 1 }));
        });

        let created = client_for(&server)
            .create_runsession_from_query("nothing matches", "eager-edgar", 0.3)
            .await
            .unwrap();

        assert!(created.is_none());
        create.assert_calls(0);
    }

    #[tokio::test]
    async fn test_create_failure_propagates() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/workspaces/ws/task-search");
            then.status(200).json_body(json!({
                "tasks": [{ "score": 0.9, "slxShortName": "api", "taskName": "Check pods" }]
            }));
        });
        server.mock(|when, then| {
            when.method(POST).path("/workspaces/ws/runsessions");
            then.status(400).body("bad persona");
        });

        let err = client_for(&server)
            .create_runsession_from_query("q", "nobody", 0.3)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(crate::error::TransportError::Status { status: 400, .. })
        ));
    }

    #[test]
    fn test_generated_session_name() {
        let name = generated_session_name();
        assert!(name.starts_with("systest-"));
        assert_eq!(name.len(), "systest-".len() + 8);
    }
}
