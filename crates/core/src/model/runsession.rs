//! RunSession, RunRequest and Issue definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{nullable, present};
use crate::{Error, Result};

/// A server-side grouping of run requests
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSession {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    pub run_requests: Vec<RunRequest>,
    #[serde(default)]
    pub persona_short_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub active: bool,
    #[serde(default)]
    pub source: Option<Value>,
}

impl RunSession {
    /// Decode a RunSession from its serialized JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode a RunSession from an already-parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    /// Number of run requests currently attached to the session
    pub fn run_request_count(&self) -> usize {
        self.run_requests.len()
    }

    /// All issues across every run request, in request order
    pub fn issues(&self) -> impl Iterator<Item = &Issue> {
        self.run_requests.iter().flat_map(|r| r.issues.iter())
    }

    pub(crate) fn label(&self) -> String {
        match self.id {
            Some(id) => format!("runsession {}", id),
            None => "runsession".to_string(),
        }
    }
}

/// Where a run request came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    SearchQuery,
    Issue,
    SliAlert,
    Alert,
}

impl Provenance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SearchQuery => "searchQuery",
            Self::Issue => "issue",
            Self::SliAlert => "sliAlert",
            Self::Alert => "alert",
        }
    }
}

/// One unit of work dispatched against an SLX
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunRequest {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub slx_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub task_titles: Vec<String>,
    #[serde(default)]
    pub from_search_query: Option<String>,
    #[serde(default)]
    pub from_issue: Option<Value>,
    #[serde(default)]
    pub from_sli_alert: Option<Value>,
    #[serde(default)]
    pub from_alert: Option<Value>,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub requester: Option<String>,
    #[serde(default)]
    pub persona: Option<Persona>,
    #[serde(default, deserialize_with = "nullable")]
    pub issues: Vec<Issue>,
}

impl RunRequest {
    /// Parsed creation timestamp, if present and well-formed
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// The first provenance field that is set
    pub fn provenance(&self) -> Option<Provenance> {
        if self
            .from_search_query
            .as_deref()
            .is_some_and(|q| !q.is_empty())
        {
            Some(Provenance::SearchQuery)
        } else if self.from_issue.is_some() {
            Some(Provenance::Issue)
        } else if self.from_sli_alert.is_some() {
            Some(Provenance::SliAlert)
        } else if self.from_alert.is_some() {
            Some(Provenance::Alert)
        } else {
            None
        }
    }

    /// Full name of the persona that handled the request
    pub fn persona_full_name(&self) -> Option<&str> {
        self.persona
            .as_ref()
            .and_then(|p| p.spec.as_ref())
            .and_then(|s| s.full_name.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Persona {
    #[serde(default)]
    pub spec: Option<PersonaSpec>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonaSpec {
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Issue severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueSeverity {
    Critical,
    High,
    Medium,
    Low,
    Unknown,
}

impl IssueSeverity {
    /// Severity assumed when an issue carries none
    pub const DEFAULT_CODE: i64 = 4;

    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Critical,
            2 => Self::High,
            3 => Self::Medium,
            4 => Self::Low,
            _ => Self::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Critical => "Critical",
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
            Self::Unknown => "Unknown",
        }
    }
}

/// An issue raised while running a request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    /// `None` when the key is absent, `Some(None)` for an explicit `null`
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub closed: Option<Option<bool>>,
    #[serde(default)]
    pub severity: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub next_steps: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl Issue {
    pub fn severity_code(&self) -> i64 {
        self.severity.unwrap_or(IssueSeverity::DEFAULT_CODE)
    }

    pub fn severity_level(&self) -> IssueSeverity {
        IssueSeverity::from_code(self.severity_code())
    }

    /// Whether the issue is still open. The `closed` key is required here;
    /// a `null` value counts as not closed.
    pub fn is_open(&self) -> Result<bool> {
        match self.closed {
            Some(closed) => Ok(!closed.unwrap_or(false)),
            None => Err(Error::missing_field(
                "closed",
                format!("issue '{}'", self.title.as_deref().unwrap_or("<untitled>")),
            )),
        }
    }
}
