//! KLD Types - Foundation Types for consortium provisioning
//!
//! This crate contains the pure data structures shared by the reconciliation
//! engine, the HTTP client and the command line tool. It depends on nothing
//! but serde.
//!
//! ## Contents
//!
//! - [`definition`]: the desired-state hierarchy read from a YAML/JSON file
//! - [`resources`]: remote entities as the provisioning API sends and receives them
//! - [`output`]: the result tree reported at the end of a reconciliation run
//!
//! ## Rules
//!
//! 1. **NO BUSINESS LOGIC** - Only data structures, constructors and accessors
//! 2. **NO WORKSPACE DEPENDENCIES**
//! 3. **SERIALIZABLE** - All types support serde

pub mod definition;
pub mod output;
pub mod resources;

pub use definition::{
    ConsortiumDefinition, ConsortiumMode, ConsortiumSpec, EnvironmentDefinition,
    MemberDefinition, NodeDefinition,
};
pub use output::{ConsortiumOut, EnvironmentCreated, MemberCreated};
pub use resources::{
    AppCreds, Consortium, Environment, GethStatus, Identifier, IssuedAppCreds, Membership, Node,
    NodeStatus, NodeUrls, QuorumStatus, NODE_STATE_INITIALIZING,
};
