//! Desired-state definition
//!
//! One named type per level of the hierarchy:
//! consortium → environment → member → node.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Root of a consortium definition file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsortiumDefinition {
    /// Consensus algorithm applied to every environment (e.g. "raft", "ibft")
    #[serde(default)]
    pub consensus: String,

    /// Node provider applied to every environment (e.g. "quorum", "geth")
    #[serde(default)]
    pub provider: String,

    /// Block until each created node leaves the "initializing" state
    #[serde(default)]
    pub waitok: bool,

    pub consortium: ConsortiumSpec,
}

/// The consortium block of a definition
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsortiumSpec {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub mode: ConsortiumMode,

    #[serde(default)]
    pub environments: Vec<EnvironmentDefinition>,
}

/// Consortium membership model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsortiumMode {
    #[default]
    #[serde(rename = "single-org")]
    SingleOrg,
    #[serde(rename = "multi-org")]
    MultiOrg,
}

impl ConsortiumMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConsortiumMode::SingleOrg => "single-org",
            ConsortiumMode::MultiOrg => "multi-org",
        }
    }

    /// Parse the wire spelling, returning `None` for anything else
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "single-org" => Some(ConsortiumMode::SingleOrg),
            "multi-org" => Some(ConsortiumMode::MultiOrg),
            _ => None,
        }
    }
}

impl fmt::Display for ConsortiumMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentDefinition {
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub members: Vec<MemberDefinition>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberDefinition {
    /// Identifier of a membership that already exists remotely.
    /// Absent or empty means a new membership is created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    #[serde(default)]
    pub nodes: Vec<NodeDefinition>,
}

impl MemberDefinition {
    /// The pre-existing membership id, if one was declared and is non-empty
    pub fn existing_id(&self) -> Option<&str> {
        self.id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeDefinition {
    pub name: String,
}
