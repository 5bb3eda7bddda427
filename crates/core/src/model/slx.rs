//! SLX catalog entries

use serde::{Deserialize, Serialize};

use super::nullable;

/// A catalog entry describing an operable target resource
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slx {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub spec: SlxSpec,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlxSpec {
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<SlxTag>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlxTag {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Slx {
    /// Whether the SLX carries the exact tag pair
    pub fn has_tag(&self, name: &str, value: &str) -> bool {
        self.spec
            .tags
            .iter()
            .any(|tag| tag.name == name && tag.value == value)
    }
}

/// The SLX listing comes either bare or wrapped in a `results` envelope
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SlxList {
    Bare(Vec<Slx>),
    Envelope {
        #[serde(default, deserialize_with = "nullable")]
        results: Vec<Slx>,
    },
}

impl SlxList {
    pub fn into_vec(self) -> Vec<Slx> {
        match self {
            Self::Bare(slxs) => slxs,
            Self::Envelope { results } => results,
        }
    }
}
