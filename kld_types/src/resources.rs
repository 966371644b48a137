//! Remote resources of the provisioning API
//!
//! The same struct serves as request body (via `new`) and as decoded
//! response. Identifiers are assigned by the service and travel as `_id`.

use serde::{Deserialize, Serialize};

use crate::definition::ConsortiumMode;

/// Node lifecycle state reported while a node is still starting
pub const NODE_STATE_INITIALIZING: &str = "initializing";

/// Body of a creation response: just the assigned identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifier {
    #[serde(rename = "_id")]
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consortium {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mode: String,
}

impl Consortium {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        mode: ConsortiumMode,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            mode: mode.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub consensus_type: String,
}

impl Environment {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        provider: impl Into<String>,
        consensus_type: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            provider: provider.into(),
            consensus_type: consensus_type.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub org_name: String,
}

impl Membership {
    pub fn new(org_name: impl Into<String>) -> Self {
        Self {
            id: None,
            org_name: org_name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub membership_id: String,
    /// Lifecycle state; only present on responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl Node {
    pub fn new(name: impl Into<String>, membership_id: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            membership_id: membership_id.into(),
            state: None,
        }
    }

    pub fn is_initializing(&self) -> bool {
        self.state.as_deref() == Some(NODE_STATE_INITIALIZING)
    }
}

/// Detailed runtime status of a started node
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStatus {
    #[serde(default)]
    pub block_height: u64,
    #[serde(default)]
    pub geth: GethStatus,
    #[serde(default)]
    pub quorum: QuorumStatus,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub urls: NodeUrls,
    #[serde(default)]
    pub user_accounts: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GethStatus {
    #[serde(default)]
    pub public_address: String,
    #[serde(default)]
    pub validators: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuorumStatus {
    #[serde(default)]
    pub private_address: String,
    #[serde(default)]
    pub public_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeUrls {
    #[serde(default)]
    pub rpc: String,
    #[serde(default)]
    pub wss: String,
}

/// Request body for issuing application credentials to a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCreds {
    pub membership_id: String,
}

impl AppCreds {
    pub fn new(membership_id: impl Into<String>) -> Self {
        Self {
            membership_id: membership_id.into(),
        }
    }
}

/// Credentials returned once by the service; the password is never shown again
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuedAppCreds {
    pub id: String,
    pub username: String,
    pub password: String,
}
