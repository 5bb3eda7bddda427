//! Open-issue selection and markdown issue reports

use serde_json::Value;

use crate::model::{Issue, RunSession};
use crate::{Error, Result};

/// Every issue across the session whose `closed` flag is false or `null`.
///
/// Fails if any issue lacks the `closed` field.
pub fn open_issues(session: &RunSession) -> Result<Vec<&Issue>> {
    let mut open = Vec::new();
    for issue in session.issues() {
        let is_open = issue.is_open().map_err(|err| match err {
            Error::MissingField { field, context } => Error::MissingField {
                field,
                context: format!("{} of {}", context, session.label()),
            },
            other => other,
        })?;
        if is_open {
            open.push(issue);
        }
    }
    Ok(open)
}

pub fn open_issue_count(session: &RunSession) -> Result<usize> {
    Ok(open_issues(session)?.len())
}

/// Titles of open issues, untitled ones skipped
pub fn open_issue_titles(session: &RunSession) -> Result<Vec<String>> {
    Ok(open_issues(session)?
        .into_iter()
        .filter_map(|issue| issue.title.clone())
        .collect())
}

fn render_details(details: Option<&Value>) -> String {
    match details {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.trim_end().to_string(),
        Some(other) => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Render issues as markdown, most severe first
pub fn issues_markdown<'a, I>(issues: I) -> String
where
    I: IntoIterator<Item = &'a Issue>,
{
    let mut sorted: Vec<&Issue> = issues.into_iter().collect();
    sorted.sort_by_key(|issue| issue.severity_code());

    sorted
        .iter()
        .map(|issue| {
            format!(
                "#### {}\n\n- **Severity:** {}\n- **Next Steps:**\n{}\n\n```\n{}\n```\n",
                issue.title.as_deref().unwrap_or("Untitled issue"),
                issue.severity_level().label(),
                issue.next_steps.as_deref().unwrap_or("").trim(),
                render_details(issue.details.as_ref()),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
