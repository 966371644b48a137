//! Result tree of a reconciliation run
//!
//! Mirrors the definition's cardinalities: one environment entry per defined
//! environment, one member entry per defined member.

use serde::{Deserialize, Serialize};

use crate::resources::{IssuedAppCreds, NodeStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsortiumOut {
    pub consortium_id: String,
    pub environments: Vec<EnvironmentCreated>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentCreated {
    pub id: String,
    pub members: Vec<MemberCreated>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberCreated {
    pub appcreds: IssuedAppCreds,
    pub id: String,
    pub name: String,
    /// Status of each node; empty unless the run waited for initialization
    pub nodes: Vec<NodeStatus>,
}

impl ConsortiumOut {
    /// Total number of member entries across all environments
    pub fn member_count(&self) -> usize {
        self.environments.iter().map(|e| e.members.len()).sum()
    }
}
