//! Participant and assistant summaries

use std::collections::BTreeSet;
use std::str::FromStr;

use crate::model::RunSession;
use crate::Error;

/// Requesters whose address contains this are platform service accounts
pub const SYSTEM_REQUESTER_DOMAIN: &str = "@workspaces.runwhen.com";
pub const SYSTEM_REQUESTER_LABEL: &str = "RunWhen System";
pub const UNKNOWN_LABEL: &str = "Unknown";

/// Output flavour for rendered summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Text,
    Markdown,
}

impl FromStr for SummaryFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(Error::InvalidInput(format!("Unknown summary format: {}", s))),
        }
    }
}

/// Distinct people and assistants that took part in a session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSummary {
    pub participants: BTreeSet<String>,
    pub assistants: BTreeSet<String>,
}

fn requester_label(requester: Option<&str>) -> String {
    match requester {
        Some(r) if r.contains(SYSTEM_REQUESTER_DOMAIN) => SYSTEM_REQUESTER_LABEL.to_string(),
        Some(r) => r.to_string(),
        None => UNKNOWN_LABEL.to_string(),
    }
}

/// Distinct requesters and persona names across every run request.
///
/// `Unknown` stands in only for an absent requester or persona name; an
/// empty string is kept as given.
pub fn participant_summary(session: &RunSession) -> ParticipantSummary {
    let mut summary = ParticipantSummary::default();
    for request in &session.run_requests {
        summary
            .participants
            .insert(requester_label(request.requester.as_deref()));
        summary.assistants.insert(
            request
                .persona_full_name()
                .unwrap_or(UNKNOWN_LABEL)
                .to_string(),
        );
    }
    summary
}

impl ParticipantSummary {
    pub fn render(&self, format: SummaryFormat) -> String {
        match format {
            SummaryFormat::Text => format!(
                "Participants: {}\nAssistants: {}",
                join_or_none(&self.participants),
                join_or_none(&self.assistants)
            ),
            SummaryFormat::Markdown => format!(
                "**Participants:**\n{}\n\n**Assistants:**\n{}",
                bullet_list(&self.participants),
                bullet_list(&self.assistants)
            ),
        }
    }
}

fn join_or_none(items: &BTreeSet<String>) -> String {
    if items.is_empty() {
        "None".to_string()
    } else {
        items.iter().cloned().collect::<Vec<_>>().join(", ")
    }
}

fn bullet_list(items: &BTreeSet<String>) -> String {
    if items.is_empty() {
        "- None".to_string()
    } else {
        items
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
