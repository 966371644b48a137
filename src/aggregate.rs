//! Result aggregation
//!
//! Pure assembly of the [`ConsortiumOut`] tree from the identifiers,
//! credentials and node statuses gathered during a run, plus the single
//! serialization used for reporting.

use kld_types::{ConsortiumOut, EnvironmentCreated, IssuedAppCreds, MemberCreated, NodeStatus};

use crate::error::{KldError, Result};

/// Accumulates environments in definition order
#[derive(Debug, Default)]
pub struct ResultBuilder {
    consortium_id: String,
    environments: Vec<EnvironmentCreated>,
}

impl ResultBuilder {
    pub fn new(consortium_id: impl Into<String>) -> Self {
        Self {
            consortium_id: consortium_id.into(),
            environments: Vec::new(),
        }
    }

    pub fn consortium_id(&self) -> &str {
        &self.consortium_id
    }

    pub fn push_environment(&mut self, environment: EnvironmentBuilder) {
        self.environments.push(environment.finish());
    }

    pub fn finish(self) -> ConsortiumOut {
        ConsortiumOut {
            consortium_id: self.consortium_id,
            environments: self.environments,
        }
    }
}

/// Accumulates the members of one environment in definition order
#[derive(Debug)]
pub struct EnvironmentBuilder {
    id: String,
    members: Vec<MemberCreated>,
}

impl EnvironmentBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn push_member(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        appcreds: IssuedAppCreds,
        nodes: Vec<NodeStatus>,
    ) {
        self.members.push(MemberCreated {
            appcreds,
            id: id.into(),
            name: name.into(),
            nodes,
        });
    }

    fn finish(self) -> EnvironmentCreated {
        EnvironmentCreated {
            id: self.id,
            members: self.members,
        }
    }
}

/// Serialize the result tree for reporting
pub fn render_json(out: &ConsortiumOut, pretty: bool) -> Result<String> {
    let rendered = if pretty {
        serde_json::to_string_pretty(out)
    } else {
        serde_json::to_string(out)
    };
    rendered.map_err(KldError::Report)
}
