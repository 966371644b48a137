//! In-memory `ResourceClient` that records every call it receives.
//!
//! Creation returns sequential ids per kind (`consortium-1`, `environment-1`,
//! ...). A single failure can be scripted for the n-th occurrence of a call.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use kld::kld_types::{AppCreds, Consortium, Environment, Membership, Node};
use kld::{ApiResponse, ClientResult, ResourceClient, TransportError};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListConsortium,
    CreateConsortium(String),
    GetConsortium(String),
    DeleteConsortium(String),
    ListEnvironments(String),
    CreateEnvironment(String),
    DeleteEnvironment(String),
    ListMemberships(String),
    CreateMembership(String),
    DeleteMembership(String),
    CreateNode { name: String, membership_id: String },
    GetNode(String),
    GetNodeStatus(String),
    CreateAppCreds(String),
}

/// Fail the `occurrence`-th (1-based) call equal to `call`.
/// `status: None` simulates a transport error.
#[derive(Debug, Clone)]
pub struct Failure {
    pub call: Call,
    pub occurrence: usize,
    pub status: Option<u16>,
}

#[derive(Default)]
struct State {
    consortiums: Vec<Consortium>,
    environments: Vec<Environment>,
    memberships: Vec<Membership>,
    node_states: VecDeque<String>,
    last_node_state: Option<String>,
    next_id: usize,
    calls: Vec<Call>,
    failure: Option<Failure>,
    malformed_appcreds: bool,
}

#[derive(Default)]
pub struct FakeClient {
    state: Mutex<State>,
}

impl FakeClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_consortium(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().consortiums.push(Consortium {
            id: Some(id.into()),
            name: name.into(),
            ..Default::default()
        });
        self
    }

    pub fn with_environment(self, id: &str, name: &str) -> Self {
        self.state.lock().unwrap().environments.push(Environment {
            id: Some(id.into()),
            name: name.into(),
            ..Default::default()
        });
        self
    }

    pub fn with_membership(self, id: &str, org_name: &str) -> Self {
        self.state.lock().unwrap().memberships.push(Membership {
            id: Some(id.into()),
            org_name: org_name.into(),
        });
        self
    }

    /// States returned by successive `get_node` calls; the last one repeats.
    /// Without a script nodes report `started`.
    pub fn with_node_states(self, states: &[&str]) -> Self {
        self.state.lock().unwrap().node_states = states.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing(self, call: Call, occurrence: usize, status: Option<u16>) -> Self {
        self.state.lock().unwrap().failure = Some(Failure {
            call,
            occurrence,
            status,
        });
        self
    }

    pub fn with_malformed_appcreds(self) -> Self {
        self.state.lock().unwrap().malformed_appcreds = true;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    pub fn environment_names(&self) -> Vec<String> {
        let state = self.state.lock().unwrap();
        state.environments.iter().map(|e| e.name.clone()).collect()
    }

    /// Record the call; returns the scripted failure if this call triggers it
    fn record(&self, call: Call) -> Option<ClientResult> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.clone());
        let failure = state.failure.clone()?;
        if failure.call != call {
            return None;
        }
        let seen = state.calls.iter().filter(|c| **c == call).count();
        if seen != failure.occurrence {
            return None;
        }
        Some(match failure.status {
            None => Err(TransportError("connection reset by peer".into())),
            Some(status) => Ok(ApiResponse::new(
                status,
                r#"{"errorMessage":"scripted failure"}"#,
            )),
        })
    }

    fn next_id(&self, kind: &str) -> String {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        format!("{}-{}", kind, state.next_id)
    }
}

fn respond(scripted: Option<ClientResult>, ok: impl FnOnce() -> ApiResponse) -> ClientResult {
    scripted.unwrap_or_else(|| Ok(ok()))
}

fn created(id: &str) -> ApiResponse {
    ApiResponse::new(201, json!({ "_id": id }).to_string())
}

#[async_trait]
impl ResourceClient for FakeClient {
    async fn list_consortium(&self) -> ClientResult {
        let rec = self.record(Call::ListConsortium);
        respond(rec, || {
            let state = self.state.lock().unwrap();
            ApiResponse::new(200, serde_json::to_string(&state.consortiums).unwrap())
        })
    }

    async fn create_consortium(&self, consortium: &Consortium) -> ClientResult {
        let rec = self.record(Call::CreateConsortium(consortium.name.clone()));
        respond(rec, || {
            let id = self.next_id("consortium");
            let mut state = self.state.lock().unwrap();
            state.consortiums.push(Consortium {
                id: Some(id.clone()),
                ..consortium.clone()
            });
            created(&id)
        })
    }

    async fn get_consortium(&self, consortium_id: &str) -> ClientResult {
        let rec = self.record(Call::GetConsortium(consortium_id.into()));
        respond(rec, || {
            let state = self.state.lock().unwrap();
            match state
                .consortiums
                .iter()
                .find(|c| c.id.as_deref() == Some(consortium_id))
            {
                Some(c) => ApiResponse::new(200, serde_json::to_string(c).unwrap()),
                None => ApiResponse::new(404, "{}"),
            }
        })
    }

    async fn delete_consortium(&self, consortium_id: &str) -> ClientResult {
        let rec = self.record(Call::DeleteConsortium(consortium_id.into()));
        respond(rec, || {
            let mut state = self.state.lock().unwrap();
            state
                .consortiums
                .retain(|c| c.id.as_deref() != Some(consortium_id));
            ApiResponse::new(202, "")
        })
    }

    async fn list_environments(&self, consortium_id: &str) -> ClientResult {
        let rec = self.record(Call::ListEnvironments(consortium_id.into()));
        respond(rec, || {
            let state = self.state.lock().unwrap();
            ApiResponse::new(200, serde_json::to_string(&state.environments).unwrap())
        })
    }

    async fn create_environment(
        &self,
        _consortium_id: &str,
        environment: &Environment,
    ) -> ClientResult {
        let rec = self.record(Call::CreateEnvironment(environment.name.clone()));
        respond(rec, || {
            let id = self.next_id("environment");
            let mut state = self.state.lock().unwrap();
            state.environments.push(Environment {
                id: Some(id.clone()),
                ..environment.clone()
            });
            created(&id)
        })
    }

    async fn delete_environment(&self, _consortium_id: &str, environment_id: &str) -> ClientResult {
        let rec = self.record(Call::DeleteEnvironment(environment_id.into()));
        respond(rec, || {
            let mut state = self.state.lock().unwrap();
            state
                .environments
                .retain(|e| e.id.as_deref() != Some(environment_id));
            ApiResponse::new(204, "")
        })
    }

    async fn list_memberships(&self, consortium_id: &str) -> ClientResult {
        let rec = self.record(Call::ListMemberships(consortium_id.into()));
        respond(rec, || {
            let state = self.state.lock().unwrap();
            ApiResponse::new(200, serde_json::to_string(&state.memberships).unwrap())
        })
    }

    async fn create_membership(
        &self,
        _consortium_id: &str,
        membership: &Membership,
    ) -> ClientResult {
        let rec = self.record(Call::CreateMembership(membership.org_name.clone()));
        respond(rec, || {
            let id = self.next_id("membership");
            let mut state = self.state.lock().unwrap();
            state.memberships.push(Membership {
                id: Some(id.clone()),
                ..membership.clone()
            });
            created(&id)
        })
    }

    async fn delete_membership(&self, _consortium_id: &str, membership_id: &str) -> ClientResult {
        let rec = self.record(Call::DeleteMembership(membership_id.into()));
        respond(rec, || {
            let mut state = self.state.lock().unwrap();
            state
                .memberships
                .retain(|m| m.id.as_deref() != Some(membership_id));
            ApiResponse::new(204, "")
        })
    }

    async fn create_node(
        &self,
        _consortium_id: &str,
        _environment_id: &str,
        node: &Node,
    ) -> ClientResult {
        let rec = self.record(Call::CreateNode {
            name: node.name.clone(),
            membership_id: node.membership_id.clone(),
        });
        respond(rec, || created(&self.next_id("node")))
    }

    async fn get_node(
        &self,
        _consortium_id: &str,
        _environment_id: &str,
        node_id: &str,
    ) -> ClientResult {
        let rec = self.record(Call::GetNode(node_id.into()));
        respond(rec, || {
            let mut state = self.state.lock().unwrap();
            let node_state = match state.node_states.pop_front() {
                Some(s) => {
                    state.last_node_state = Some(s.clone());
                    s
                }
                None => state
                    .last_node_state
                    .clone()
                    .unwrap_or_else(|| "started".to_string()),
            };
            ApiResponse::new(
                200,
                json!({ "_id": node_id, "state": node_state }).to_string(),
            )
        })
    }

    async fn get_node_status(
        &self,
        _consortium_id: &str,
        _environment_id: &str,
        node_id: &str,
    ) -> ClientResult {
        let rec = self.record(Call::GetNodeStatus(node_id.into()));
        respond(rec, || {
            ApiResponse::new(
                200,
                json!({
                    "id": node_id,
                    "block_height": 7,
                    "geth": { "public_address": "0xabc", "validators": ["0x1", "0x2"] },
                    "urls": {
                        "rpc": format!("https://{node_id}.rpc"),
                        "wss": format!("wss://{node_id}.ws")
                    },
                    "user_accounts": ["0xuser"]
                })
                .to_string(),
            )
        })
    }

    async fn create_app_creds(
        &self,
        _consortium_id: &str,
        _environment_id: &str,
        appcreds: &AppCreds,
    ) -> ClientResult {
        let rec = self.record(Call::CreateAppCreds(appcreds.membership_id.clone()));
        respond(rec, || {
            if self.state.lock().unwrap().malformed_appcreds {
                return ApiResponse::new(201, r#"{"id": 42}"#);
            }
            let id = self.next_id("appcreds");
            ApiResponse::new(
                201,
                json!({ "id": id, "username": format!("{id}-user"), "password": "s3cret" })
                    .to_string(),
            )
        })
    }
}
