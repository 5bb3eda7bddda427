//! Task-search result to RunSession creation request mapping

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::model::TaskSearchResult;

/// Minimum score a search hit needs to be scheduled
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.3;

/// Options for building a RunSession creation request
#[derive(Debug, Clone)]
pub struct MapperOptions {
    /// Workspace the SLX names are qualified with
    pub workspace: String,
    /// Persona the session runs as
    pub persona_short_name: String,
    /// Hits scoring strictly below this are dropped
    pub score_threshold: f64,
}

impl MapperOptions {
    pub fn new(workspace: impl Into<String>, persona_short_name: impl Into<String>) -> Self {
        Self {
            workspace: workspace.into(),
            persona_short_name: persona_short_name.into(),
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    /// Set the score threshold
    pub fn with_score_threshold(mut self, score_threshold: f64) -> Self {
        self.score_threshold = score_threshold;
        self
    }
}

/// Body of `POST /workspaces/{ws}/runsessions`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSessionCreate {
    pub name: String,
    pub run_requests: Vec<RunRequestCreate>,
    pub persona_short_name: String,
    pub active: bool,
}

/// One requested run against a single SLX
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequestCreate {
    pub slx_name: String,
    pub task_titles: Vec<String>,
    pub from_search_query: String,
    pub from_issue: Option<Value>,
}

/// Prefix an SLX name with `{workspace}--` unless it already has it
pub fn qualify_slx_name(workspace: &str, slx_name: &str) -> String {
    let prefix = format!("{}--", workspace);
    if slx_name.starts_with(&prefix) {
        slx_name.to_string()
    } else {
        format!("{}{}", prefix, slx_name)
    }
}

/// Build a RunSession creation request from search hits.
///
/// Returns `None` when the search produced no tasks at all. Hits are grouped
/// per qualified SLX name in first-seen order.
pub fn build_runsession_request(
    result: &TaskSearchResult,
    query: &str,
    name: impl Into<String>,
    options: &MapperOptions,
) -> Option<RunSessionCreate> {
    if result.tasks.is_empty() {
        return None;
    }

    let mut run_requests: Vec<RunRequestCreate> = Vec::new();
    let mut index_by_slx: HashMap<String, usize> = HashMap::new();

    for task in &result.tasks {
        if task.score() < options.score_threshold {
            continue;
        }

        let (Some(target), Some(title)) = (task.target(), task.title()) else {
            continue;
        };
        let slx_name = qualify_slx_name(&options.workspace, target);

        match index_by_slx.get(&slx_name) {
            Some(&idx) => run_requests[idx].task_titles.push(title.to_string()),
            None => {
                index_by_slx.insert(slx_name.clone(), run_requests.len());
                run_requests.push(RunRequestCreate {
                    slx_name,
                    task_titles: vec![title.to_string()],
                    from_search_query: query.to_string(),
                    from_issue: None,
                });
            }
        }
    }

    Some(RunSessionCreate {
        name: name.into(),
        run_requests,
        persona_short_name: options.persona_short_name.clone(),
        active: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search(tasks: Value) -> TaskSearchResult {
        serde_json::from_value(json!({ "tasks": tasks })).unwrap()
    }

    fn options() -> MapperOptions {
        MapperOptions::new("ws", "eager-edgar")
    }

    #[test]
    fn test_empty_tasks_yields_none() {
        let result = search(json!([]));
        assert!(build_runsession_request(&result, "q", "s", &options()).is_none());
    }

    #[test]
    fn test_qualify_slx_name() {
        assert_eq!(qualify_slx_name("ws", "foo"), "ws--foo");
        assert_eq!(qualify_slx_name("ws", "ws--foo"), "ws--foo");
        assert_eq!(qualify_slx_name("ws", "other--foo"), "ws--other--foo");
    }

    #[test]
    fn test_score_threshold_is_inclusive() {
        let result = search(json!([
            { "score": 0.3, "slxShortName": "kept", "taskName": "A" },
            { "score": 0.29999, "slxShortName": "dropped", "taskName": "B" }
        ]));

        let request = build_runsession_request(&result, "q", "s", &options()).unwrap();
        assert_eq!(request.run_requests.len(), 1);
        assert_eq!(request.run_requests[0].slx_name, "ws--kept");
    }

    #[test]
    fn test_groups_titles_by_slx_in_first_seen_order() {
        let result = search(json!([
            { "score": 0.9, "workspaceTask": { "slxShortName": "api", "unresolvedTitle": "Check pods" } },
            { "score": 0.8, "slxShortName": "db", "taskName": "Check locks" },
            { "score": 0.7, "workspaceTask": { "slxName": "ws--api", "resolvedTitle": "Check ingress" } },
            { "score": 0.6, "slxShortName": "cache" },
            { "score": 0.6, "taskName": "Orphan title" }
        ]));

        let request =
            build_runsession_request(&result, "why is checkout slow", "systest-1", &options())
                .unwrap();

        assert_eq!(request.name, "systest-1");
        assert_eq!(request.persona_short_name, "eager-edgar");
        assert!(request.active);
        assert_eq!(request.run_requests.len(), 2);
        assert_eq!(request.run_requests[0].slx_name, "ws--api");
        assert_eq!(
            request.run_requests[0].task_titles,
            vec!["Check pods", "Check ingress"]
        );
        assert_eq!(request.run_requests[1].slx_name, "ws--db");
        assert_eq!(request.run_requests[1].from_search_query, "why is checkout slow");
    }

    #[test]
    fn test_serialized_payload_shape() {
        let result = search(json!([
            { "score": 1.0, "slxShortName": "api", "taskName": "Check pods" }
        ]));
        let request = build_runsession_request(&result, "q", "s", &options()).unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "s",
                "runRequests": [{
                    "slxName": "ws--api",
                    "taskTitles": ["Check pods"],
                    "fromSearchQuery": "q",
                    "fromIssue": null
                }],
                "personaShortName": "eager-edgar",
                "active": true
            })
        );
    }

    #[test]
    fn test_all_filtered_still_builds_empty_request() {
        let result = search(json!([{ "score": 0.1, "slxShortName": "api", "taskName": "A" }]));
        let request = build_runsession_request(&result, "q", "s", &options()).unwrap();
        assert!(request.run_requests.is_empty());
    }
}
