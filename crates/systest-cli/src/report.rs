//! Human-readable RunSession reports

use rw_core::analytics::{
    issue_keywords, issues_markdown, most_referenced_resource, open_issues, participant_summary,
    runsession_source, SummaryFormat,
};
use rw_core::model::RunSession;

/// Render everything the analytics layer knows about a session
pub fn render_report(session: &RunSession, format: SummaryFormat) -> rw_core::Result<String> {
    let open = open_issues(session)?;
    let open_count = open.len();
    let mut keywords: Vec<String> = issue_keywords(session)?.into_iter().collect();
    keywords.sort();
    let keywords = if keywords.is_empty() {
        "None".to_string()
    } else {
        keywords.join(", ")
    };

    let session_label = session
        .id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "?".to_string());
    let participants = participant_summary(session).render(format);

    let report = match format {
        SummaryFormat::Text => format!(
            "RunSession {}\nSource: {}\nRun requests: {}\nOpen issues: {}\nKeywords: {}\n\
             Most referenced: {}\n{}",
            session_label,
            runsession_source(session),
            session.run_request_count(),
            open_count,
            keywords,
            most_referenced_resource(session),
            participants,
        ),
        SummaryFormat::Markdown => format!(
            "## RunSession {}\n\n- **Source:** {}\n- **Run requests:** {}\n- **Open issues:** {}\n\
             - **Keywords:** {}\n- **Most referenced:** {}\n\n{}\n\n### Open issues\n\n{}",
            session_label,
            runsession_source(session),
            session.run_request_count(),
            open_count,
            keywords,
            most_referenced_resource(session),
            participants,
            issues_markdown(open),
        ),
    };
    Ok(report)
}
