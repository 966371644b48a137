//! kld - Kaleido consortium provisioning
//!
//! Provisions a consortium, its environments, member organizations, nodes and
//! per-member application credentials from a declarative YAML definition.
//!
//! ## Modules
//!
//! - [`reconcile`]: the reconciliation engine and its entry point
//! - [`poller`]: bounded, cancellable wait for node initialization
//! - [`aggregate`]: result tree assembly and reporting
//! - [`client`]: the `ResourceClient` trait, the HTTP implementation and
//!   response validation
//! - [`config`]: API URL / key resolution
//! - [`definition`]: definition file loading and validation

pub mod aggregate;
pub mod client;
pub mod config;
pub mod definition;
pub mod error;
pub mod poller;
pub mod reconcile;

pub use client::{ApiResponse, ClientResult, KaleidoClient, ResourceClient, TransportError};
pub use config::{ClientConfig, ConfigOverrides};
pub use error::{KldError, Result};
pub use poller::{NodeWait, PollPolicy};
pub use reconcile::{reconcile, ReconcileOptions, Reconciler};

pub use kld_types;
