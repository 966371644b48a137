//! Resource client — the sole boundary between reconciliation and the
//! provisioning API.
//!
//! Every operation returns the raw response (status + body) or a transport
//! error. Classifying the status and decoding the body is left to
//! [`validate`], so implementations stay thin.

pub mod http;
pub mod validate;

use async_trait::async_trait;
use kld_types::{AppCreds, Consortium, Environment, Membership, Node};
use thiserror::Error;

pub use http::KaleidoClient;
pub use validate::{
    decode, validate_creation_response, validate_deletion_response, validate_get_response,
};

/// Raw response of one API call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// The request did not produce an HTTP response at all
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct TransportError(pub String);

pub type ClientResult = std::result::Result<ApiResponse, TransportError>;

#[async_trait]
pub trait ResourceClient: Send + Sync {
    // ── Consortium ──

    async fn list_consortium(&self) -> ClientResult;
    async fn create_consortium(&self, consortium: &Consortium) -> ClientResult;
    async fn get_consortium(&self, consortium_id: &str) -> ClientResult;
    async fn delete_consortium(&self, consortium_id: &str) -> ClientResult;

    // ── Environment ──

    async fn list_environments(&self, consortium_id: &str) -> ClientResult;
    async fn create_environment(
        &self,
        consortium_id: &str,
        environment: &Environment,
    ) -> ClientResult;
    async fn delete_environment(&self, consortium_id: &str, environment_id: &str)
        -> ClientResult;

    // ── Membership ──

    async fn list_memberships(&self, consortium_id: &str) -> ClientResult;
    async fn create_membership(&self, consortium_id: &str, membership: &Membership)
        -> ClientResult;
    async fn delete_membership(&self, consortium_id: &str, membership_id: &str) -> ClientResult;

    // ── Node ──

    async fn create_node(&self, consortium_id: &str, environment_id: &str, node: &Node)
        -> ClientResult;
    async fn get_node(&self, consortium_id: &str, environment_id: &str, node_id: &str)
        -> ClientResult;
    async fn get_node_status(
        &self,
        consortium_id: &str,
        environment_id: &str,
        node_id: &str,
    ) -> ClientResult;

    // ── App credentials ──

    async fn create_app_creds(
        &self,
        consortium_id: &str,
        environment_id: &str,
        appcreds: &AppCreds,
    ) -> ClientResult;
}
