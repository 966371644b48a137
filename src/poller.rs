//! Node initialization poller
//!
//! Waits for a freshly created node to leave the `initializing` state, then
//! fetches its detailed status. The wait is bounded by a deadline and can be
//! cancelled; time is read from `tokio::time`, so tests can run it against a
//! paused clock.

use std::time::Duration;

use kld_types::{Node, NodeStatus};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::{decode, validate_get_response, ResourceClient};
use crate::error::{KldError, Result};

/// Sleep between two state checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Total initialization budget per node: 30 minutes
pub const DEFAULT_INIT_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_INIT_TIMEOUT,
        }
    }
}

impl PollPolicy {
    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            ..Self::default()
        }
    }
}

/// Address of one node within the hierarchy
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    pub consortium_id: &'a str,
    pub environment_id: &'a str,
    pub node_id: &'a str,
}

/// How the wait ended. Errors (transport, status, decoding, cancellation)
/// come back as `Err`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeWait {
    /// The node reported a state other than `initializing`
    Ready { state: Option<String> },
    /// The node was still `initializing` when the budget ran out
    TimedOut { elapsed: Duration },
}

impl NodeWait {
    pub fn is_ready(&self) -> bool {
        matches!(self, NodeWait::Ready { .. })
    }
}

/// Block until the node is no longer initializing, the timeout elapses, or
/// `cancel` fires.
pub async fn wait_for_node<C>(
    client: &C,
    node: NodeRef<'_>,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<NodeWait>
where
    C: ResourceClient + ?Sized,
{
    let start = Instant::now();
    // A timeout too large to represent never expires
    let deadline = start.checked_add(policy.timeout);
    let mut current = fetch_node(client, node).await?;

    loop {
        if !current.is_initializing() {
            debug!(node_id = node.node_id, state = ?current.state, "Node ready");
            return Ok(NodeWait::Ready {
                state: current.state,
            });
        }

        let now = Instant::now();
        if deadline.is_some_and(|deadline| now >= deadline) {
            return Ok(NodeWait::TimedOut {
                elapsed: now - start,
            });
        }

        info!(
            node_id = node.node_id,
            elapsed_secs = (now - start).as_secs(),
            "Waiting for node to start"
        );

        let pause = match deadline {
            Some(deadline) => policy.interval.min(deadline - now),
            None => policy.interval,
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Err(KldError::Cancelled {
                    node_id: node.node_id.to_string(),
                });
            }
            _ = tokio::time::sleep(pause) => {}
        }

        current = fetch_node(client, node).await?;
    }
}

/// Wait for the node, then fetch its status regardless of how the wait ended
pub async fn poll_node_status<C>(
    client: &C,
    node: NodeRef<'_>,
    policy: &PollPolicy,
    cancel: &CancellationToken,
) -> Result<(NodeWait, NodeStatus)>
where
    C: ResourceClient + ?Sized,
{
    let outcome = wait_for_node(client, node, policy, cancel).await?;

    debug!(node_id = node.node_id, "Getting status for node");
    let res = client
        .get_node_status(node.consortium_id, node.environment_id, node.node_id)
        .await;
    let res = validate_get_response(res, "node status")?;
    let status: NodeStatus = decode(&res, "node status")?;

    Ok((outcome, status))
}

async fn fetch_node<C>(client: &C, node: NodeRef<'_>) -> Result<Node>
where
    C: ResourceClient + ?Sized,
{
    let res = client
        .get_node(node.consortium_id, node.environment_id, node.node_id)
        .await;
    let res = validate_get_response(res, "node")?;
    decode(&res, "node")
}
