//! Task-search response model
//!
//! The platform returns two shapes of search hit. Each hit is decoded on its
//! own, so a response mixing both shapes is handled.

use serde::{Deserialize, Serialize};

use super::nullable;

/// Response of the task-search endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSearchResult {
    #[serde(default, deserialize_with = "nullable")]
    pub tasks: Vec<SearchTask>,
}

/// A single scored search hit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SearchTask {
    /// Hit carrying a nested `workspaceTask` object
    Workspace(WorkspaceTaskHit),
    /// Hit with the task fields flattened onto the top level
    Flat(FlatTaskHit),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTaskHit {
    #[serde(default, deserialize_with = "nullable")]
    pub score: f64,
    pub workspace_task: WorkspaceTask,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceTask {
    #[serde(default)]
    pub slx_short_name: Option<String>,
    #[serde(default)]
    pub slx_name: Option<String>,
    #[serde(default)]
    pub unresolved_title: Option<String>,
    #[serde(default)]
    pub resolved_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlatTaskHit {
    #[serde(default, deserialize_with = "nullable")]
    pub score: f64,
    #[serde(default)]
    pub slx_short_name: Option<String>,
    #[serde(default)]
    pub slx_name: Option<String>,
    #[serde(default)]
    pub task_name: Option<String>,
    #[serde(default)]
    pub resolved_task_name: Option<String>,
}

fn first_present<'a>(primary: &'a Option<String>, fallback: &'a Option<String>) -> Option<&'a str> {
    primary
        .as_deref()
        .filter(|s| !s.is_empty())
        .or_else(|| fallback.as_deref().filter(|s| !s.is_empty()))
}

impl SearchTask {
    pub fn score(&self) -> f64 {
        match self {
            Self::Workspace(hit) => hit.score,
            Self::Flat(hit) => hit.score,
        }
    }

    /// Target SLX identifier, short name preferred
    pub fn target(&self) -> Option<&str> {
        match self {
            Self::Workspace(hit) => first_present(
                &hit.workspace_task.slx_short_name,
                &hit.workspace_task.slx_name,
            ),
            Self::Flat(hit) => first_present(&hit.slx_short_name, &hit.slx_name),
        }
    }

    /// Task title, unresolved form preferred
    pub fn title(&self) -> Option<&str> {
        match self {
            Self::Workspace(hit) => first_present(
                &hit.workspace_task.unresolved_title,
                &hit.workspace_task.resolved_title,
            ),
            Self::Flat(hit) => first_present(&hit.task_name, &hit.resolved_task_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mixed_shapes_decode_per_hit() {
        let result: TaskSearchResult = serde_json::from_value(json!({
            "tasks": [
                {
                    "score": 0.9,
                    "workspaceTask": {
                        "slxShortName": "api",
                        "unresolvedTitle": "Check API health in ${NAMESPACE}",
                        "resolvedTitle": "Check API health in prod"
                    }
                },
                {
                    "score": 0.5,
                    "slxName": "ws--db",
                    "resolvedTaskName": "Inspect database locks"
                }
            ]
        }))
        .unwrap();

        assert!(matches!(result.tasks[0], SearchTask::Workspace(_)));
        assert!(matches!(result.tasks[1], SearchTask::Flat(_)));
        assert_eq!(result.tasks[0].target(), Some("api"));
        assert_eq!(result.tasks[0].title(), Some("Check API health in ${NAMESPACE}"));
        assert_eq!(result.tasks[1].target(), Some("ws--db"));
        assert_eq!(result.tasks[1].title(), Some("Inspect database locks"));
    }

    #[test]
    fn test_empty_primary_falls_back() {
        let task = SearchTask::Flat(FlatTaskHit {
            score: 1.0,
            slx_short_name: Some(String::new()),
            slx_name: Some("cache".to_string()),
            task_name: None,
            resolved_task_name: None,
        });
        assert_eq!(task.target(), Some("cache"));
        assert_eq!(task.title(), None);
    }

    #[test]
    fn test_null_tasks_is_empty() {
        let result: TaskSearchResult = serde_json::from_value(json!({ "tasks": null })).unwrap();
        assert!(result.tasks.is_empty());
    }
}
