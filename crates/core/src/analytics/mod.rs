//! Read-only analytics over fetched RunSession documents

mod issues;
mod keywords;
mod participants;
mod provenance;

pub use issues::{issues_markdown, open_issue_count, open_issue_titles, open_issues};
pub use keywords::{
    extract_backtick_terms, issue_keywords, most_referenced_resource,
    most_referenced_resource_with_count, NO_KEYWORDS_FOUND,
};
pub use participants::{
    participant_summary, ParticipantSummary, SummaryFormat, SYSTEM_REQUESTER_DOMAIN,
    SYSTEM_REQUESTER_LABEL, UNKNOWN_LABEL,
};
pub use provenance::{runsession_source, UNKNOWN_SOURCE};
