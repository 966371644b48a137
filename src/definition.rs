//! Loading and validating consortium definition files

use std::path::Path;

use kld_types::ConsortiumDefinition;

use crate::error::{KldError, Result};

/// Load a definition from a YAML (or JSON) file and validate it
pub fn load_definition<P: AsRef<Path>>(path: P) -> Result<ConsortiumDefinition> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| KldError::DefinitionRead {
        path: path.to_path_buf(),
        source,
    })?;
    parse_definition(&content)
}

/// Parse a definition from a YAML string and validate it
pub fn parse_definition(yaml: &str) -> Result<ConsortiumDefinition> {
    let definition: ConsortiumDefinition = serde_yaml::from_str(yaml)?;
    validate_definition(&definition)?;
    Ok(definition)
}

/// Every level must be named; names are the reconciliation key.
pub fn validate_definition(definition: &ConsortiumDefinition) -> Result<()> {
    let consortium = &definition.consortium;
    if consortium.name.trim().is_empty() {
        return Err(KldError::InvalidDefinition(
            "consortium name is required".into(),
        ));
    }

    for (e, env) in consortium.environments.iter().enumerate() {
        if env.name.trim().is_empty() {
            return Err(KldError::InvalidDefinition(format!(
                "environment #{} has no name",
                e + 1
            )));
        }
        for (m, member) in env.members.iter().enumerate() {
            if member.name.trim().is_empty() {
                return Err(KldError::InvalidDefinition(format!(
                    "member #{} of environment '{}' has no name",
                    m + 1,
                    env.name
                )));
            }
            if let Some(n) = member.nodes.iter().position(|n| n.name.trim().is_empty()) {
                return Err(KldError::InvalidDefinition(format!(
                    "node #{} of member '{}' has no name",
                    n + 1,
                    member.name
                )));
            }
        }
    }

    Ok(())
}
