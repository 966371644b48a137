//! Error types for consortium provisioning
//!
//! Every failure is fatal to a reconciliation run. Errors propagate up to the
//! entry point unchanged; only the binary decides to exit the process.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, KldError>;

#[derive(Error, Debug)]
pub enum KldError {
    /// Client configuration could not be resolved
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Error reading definition file {path}: {source}")]
    DefinitionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error parsing definition: {0}")]
    DefinitionParse(#[from] serde_yaml::Error),

    #[error("Invalid definition: {0}")]
    InvalidDefinition(String),

    /// The request never produced an HTTP response
    #[error("Failed to {action} {kind}: {message}")]
    Transport {
        kind: &'static str,
        action: &'static str,
        message: String,
    },

    /// The service answered with a status outside the expected success class
    #[error("Failed to {action} {kind}: status {status}: {body}")]
    Remote {
        kind: &'static str,
        action: &'static str,
        status: u16,
        body: String,
    },

    #[error("Unmarshal {kind}: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Listed {kind} '{name}' has no _id")]
    MissingId { kind: &'static str, name: String },

    #[error("Reconciliation cancelled while waiting for node {node_id}")]
    Cancelled { node_id: String },

    #[error("Failed to serialize result: {0}")]
    Report(#[source] serde_json::Error),
}

impl KldError {
    /// True for errors raised by the remote service or the transport to it
    pub fn is_remote(&self) -> bool {
        matches!(self, KldError::Transport { .. } | KldError::Remote { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_message() {
        let err = KldError::Remote {
            kind: "environment",
            action: "create",
            status: 409,
            body: "conflict".into(),
        };
        assert_eq!(err.to_string(), "Failed to create environment: status 409: conflict");
        assert!(err.is_remote());
    }

    #[test]
    fn test_decode_is_not_remote() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = KldError::Decode { kind: "appcreds", source };
        assert!(err.to_string().starts_with("Unmarshal appcreds:"));
        assert!(!err.is_remote());
    }
}
