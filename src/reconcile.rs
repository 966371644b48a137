//! Consortium reconciliation engine
//!
//! Walks a [`ConsortiumDefinition`] top-down and drives the remote state:
//!
//! 1. consortium: reused when one with the same name exists, else created
//! 2. environment: a same-named one is deleted (together with every
//!    membership whose org name contains the environment name), then a new
//!    one is always created
//! 3. member: created unless the definition carries an id
//! 4. node: created, optionally waited for until initialized
//! 5. app credentials: issued per member
//!
//! Steps run strictly one after another. The first failure aborts the run;
//! resources created before it are left in place.

use std::path::Path;

use kld_types::{
    AppCreds, Consortium, ConsortiumDefinition, ConsortiumOut, ConsortiumSpec, Environment,
    EnvironmentDefinition, Identifier, IssuedAppCreds, MemberDefinition, Membership, Node,
    NodeStatus,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::aggregate::{EnvironmentBuilder, ResultBuilder};
use crate::client::{
    decode, validate_creation_response, validate_deletion_response, validate_get_response,
    ResourceClient,
};
use crate::definition::load_definition;
use crate::error::{KldError, Result};
use crate::poller::{poll_node_status, NodeRef, NodeWait, PollPolicy};

/// Parameters of one reconciliation run
#[derive(Debug, Clone, Default)]
pub struct ReconcileOptions {
    pub poll: PollPolicy,
    /// Aborts a pending node wait
    pub cancel: CancellationToken,
}

/// Load the definition at `definition_path` and reconcile it
pub async fn reconcile<C>(
    client: &C,
    definition_path: &Path,
    options: ReconcileOptions,
) -> Result<ConsortiumOut>
where
    C: ResourceClient + ?Sized,
{
    let definition = load_definition(definition_path)?;
    Reconciler::new(client, options).run(&definition).await
}

pub struct Reconciler<'a, C: ResourceClient + ?Sized> {
    client: &'a C,
    options: ReconcileOptions,
}

impl<'a, C: ResourceClient + ?Sized> Reconciler<'a, C> {
    pub fn new(client: &'a C, options: ReconcileOptions) -> Self {
        Self { client, options }
    }

    pub async fn run(&self, definition: &ConsortiumDefinition) -> Result<ConsortiumOut> {
        let consortium_id = self.resolve_consortium(&definition.consortium).await?;
        let mut out = ResultBuilder::new(consortium_id);

        for env in &definition.consortium.environments {
            let environment = self
                .recreate_environment(out.consortium_id(), definition, env)
                .await?;
            out.push_environment(environment);
        }

        Ok(out.finish())
    }

    async fn resolve_consortium(&self, spec: &ConsortiumSpec) -> Result<String> {
        info!(name = %spec.name, "Creating consortium");

        let res = validate_get_response(self.client.list_consortium().await, "consortium")?;
        let existing: Vec<Consortium> = decode(&res, "consortium")?;

        // Later entries shadow earlier ones with the same name
        if let Some(found) = existing.iter().rfind(|c| c.name == spec.name) {
            let id = required_id(&found.id, "consortium", &found.name)?;
            info!(name = %spec.name, consortium_id = %id, "Existing consortium found");
            return Ok(id.to_string());
        }

        let body = Consortium::new(&spec.name, &spec.description, spec.mode);
        let res = validate_creation_response(
            self.client.create_consortium(&body).await,
            "consortium",
        )?;
        let created: Identifier = decode(&res, "consortium")?;
        info!(consortium_id = %created.id, "Consortium created");
        Ok(created.id)
    }

    async fn recreate_environment(
        &self,
        consortium_id: &str,
        definition: &ConsortiumDefinition,
        env: &EnvironmentDefinition,
    ) -> Result<EnvironmentBuilder> {
        info!(
            name = %env.name,
            provider = %definition.provider,
            consensus = %definition.consensus,
            "Creating environment"
        );

        self.remove_stale_environment(consortium_id, &env.name).await?;

        let body = Environment::new(
            &env.name,
            &env.description,
            &definition.provider,
            &definition.consensus,
        );
        let res = validate_creation_response(
            self.client.create_environment(consortium_id, &body).await,
            "environment",
        )?;
        let created: Identifier = decode(&res, "environment")?;
        info!(name = %env.name, environment_id = %created.id, "Environment created");

        let mut environment = EnvironmentBuilder::new(created.id);
        for member in &env.members {
            self.provision_member(consortium_id, definition.waitok, &mut environment, member)
                .await?;
        }
        Ok(environment)
    }

    /// Delete every same-named environment and the memberships tied to it
    async fn remove_stale_environment(&self, consortium_id: &str, name: &str) -> Result<()> {
        let res = validate_get_response(
            self.client.list_environments(consortium_id).await,
            "environment",
        )?;
        let existing: Vec<Environment> = decode(&res, "environment")?;

        for stale in existing.iter().filter(|e| e.name == name) {
            let env_id = required_id(&stale.id, "environment", &stale.name)?;
            info!(environment = name, environment_id = env_id, "Deleting old environment");
            validate_deletion_response(
                self.client.delete_environment(consortium_id, env_id).await,
                "environment",
            )?;

            let res = validate_get_response(
                self.client.list_memberships(consortium_id).await,
                "membership",
            )?;
            let memberships: Vec<Membership> = decode(&res, "membership")?;

            for member in memberships.iter().filter(|m| m.org_name.contains(name)) {
                let member_id = required_id(&member.id, "membership", &member.org_name)?;
                info!(
                    org_name = %member.org_name,
                    membership_id = member_id,
                    "Deleting membership"
                );
                validate_deletion_response(
                    self.client.delete_membership(consortium_id, member_id).await,
                    "membership",
                )?;
            }
        }

        Ok(())
    }

    async fn provision_member(
        &self,
        consortium_id: &str,
        wait: bool,
        environment: &mut EnvironmentBuilder,
        member: &MemberDefinition,
    ) -> Result<()> {
        let member_id = match member.existing_id() {
            Some(id) => {
                info!(name = %member.name, membership_id = id, "Using existing membership");
                id.to_string()
            }
            None => {
                info!(name = %member.name, "Creating membership");
                let res = validate_creation_response(
                    self.client
                        .create_membership(consortium_id, &Membership::new(&member.name))
                        .await,
                    "membership",
                )?;
                let created: Identifier = decode(&res, "membership")?;
                created.id
            }
        };

        let mut nodes = Vec::new();
        for node in &member.nodes {
            info!(node = %node.name, member = %member.name, "Creating node");
            let body = Node::new(&node.name, &member_id);
            let res = validate_creation_response(
                self.client
                    .create_node(consortium_id, environment.id(), &body)
                    .await,
                "node",
            )?;
            if wait {
                let created: Identifier = decode(&res, "node")?;
                let status = self
                    .await_node(consortium_id, environment.id(), &created.id)
                    .await?;
                nodes.push(status);
            }
        }

        let res = validate_creation_response(
            self.client
                .create_app_creds(consortium_id, environment.id(), &AppCreds::new(&member_id))
                .await,
            "appcreds",
        )?;
        let appcreds: IssuedAppCreds = decode(&res, "appcreds")?;
        info!(member = %member.name, appcreds_id = %appcreds.id, "App credentials issued");

        environment.push_member(member_id, &member.name, appcreds, nodes);
        Ok(())
    }

    async fn await_node(
        &self,
        consortium_id: &str,
        environment_id: &str,
        node_id: &str,
    ) -> Result<NodeStatus> {
        let node = NodeRef {
            consortium_id,
            environment_id,
            node_id,
        };
        let (outcome, status) =
            poll_node_status(self.client, node, &self.options.poll, &self.options.cancel).await?;

        match outcome {
            NodeWait::Ready { state } => info!(node_id, ?state, "Node initialized"),
            NodeWait::TimedOut { elapsed } => warn!(
                node_id,
                elapsed_secs = elapsed.as_secs(),
                "Node still initializing after timeout, reporting current status"
            ),
        }
        Ok(status)
    }
}

fn required_id<'e>(id: &'e Option<String>, kind: &'static str, name: &str) -> Result<&'e str> {
    id.as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| KldError::MissingId {
            kind,
            name: name.to_string(),
        })
}
