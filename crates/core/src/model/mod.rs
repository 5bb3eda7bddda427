//! Platform API document model
//!
//! Documents are decoded leniently: absent or `null` collections become
//! empty and unknown fields are ignored.

mod runsession;
mod slx;
mod task_search;

pub use runsession::{Issue, IssueSeverity, Persona, PersonaSpec, Provenance, RunRequest, RunSession};
pub use slx::{Slx, SlxList, SlxSpec, SlxTag};
pub use task_search::{FlatTaskHit, SearchTask, TaskSearchResult, WorkspaceTask, WorkspaceTaskHit};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` the same as an absent field.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Keep an explicit `null` apart from an absent field: absent stays `None`
/// through `#[serde(default)]`, present decodes to `Some(value)`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
